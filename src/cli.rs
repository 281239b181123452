use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "klogs", version)]
#[command(about = "Save logs of Kubernetes pods to disk, optionally following new pods as they appear")]
pub struct Cli {
    /// Absolute path to the kubeconfig file
    #[arg(long)]
    pub kubeconfig: Option<PathBuf>,

    /// Namespace (defaults to the namespace of the current context)
    #[arg(short = 'n', long)]
    pub namespace: Option<String>,

    /// Label selector; repeat to collect several sets of pods
    #[arg(short = 'l', long = "label")]
    pub labels: Vec<String>,

    /// Collect logs of every pod in the namespace
    #[arg(short = 'a', long = "all")]
    pub all_pods: bool,

    /// Directory for the log files (defaults to logs/<date>)
    #[arg(short = 'p', long = "logpath")]
    pub log_path: Option<PathBuf>,

    /// Lines of recent log to fetch per container; -1 for all
    #[arg(short = 't', long, default_value_t = -1, allow_negative_numbers = true)]
    pub tail: i64,

    /// Only return logs newer than a relative duration like 5s, 2m, or 3h
    #[arg(short = 's', long)]
    pub since: Option<String>,

    /// Keep streaming and keep looking for new pods
    #[arg(short = 'f', long)]
    pub follow: bool,

    /// Include init containers
    #[arg(short = 'i', long = "init-containers")]
    pub init_containers: bool,

    /// Never start the dashboard, even on a terminal
    #[arg(long)]
    pub no_tui: bool,

    /// Enable debug logging
    #[arg(short = 'v', long)]
    pub verbose: bool,
}
