use std::path::PathBuf;
use std::time::Duration;

use crate::cli::Cli;
use crate::error::Result;
use crate::types::LogOptions;
use crate::utils::{since_seconds, tail_lines};

pub const DISCOVERY_PERIOD: Duration = Duration::from_secs(5);
pub const STATUS_REFRESH_PERIOD: Duration = Duration::from_secs(1);
pub const SIZE_REFRESH_PERIOD: Duration = Duration::from_secs(2);
pub const NOTICE_TTL: Duration = Duration::from_secs(5);
pub const QUEUE_CAPACITY: usize = 50;
/// How long a follow run waits for capture tasks to finish their last write.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Run settings resolved once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub context: String,
    pub namespace: String,
    pub log_path: PathBuf,
    pub follow: bool,
    pub init_containers: bool,
    /// Base log options; the container name is filled in per task.
    pub log_options: LogOptions,
    pub discovery_period: Duration,
    pub status_period: Duration,
    pub size_period: Duration,
    pub notice_ttl: Duration,
    pub queue_capacity: usize,
}

impl Settings {
    pub fn new(context: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            namespace: namespace.into(),
            log_path: default_log_path(),
            follow: false,
            init_containers: false,
            log_options: LogOptions::default(),
            discovery_period: DISCOVERY_PERIOD,
            status_period: STATUS_REFRESH_PERIOD,
            size_period: SIZE_REFRESH_PERIOD,
            notice_ttl: NOTICE_TTL,
            queue_capacity: QUEUE_CAPACITY,
        }
    }

    /// Apply the command line on top of the defaults. Fails on an unparsable
    /// `--since`. Context and namespace are filled in once the cluster is known.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut settings = Settings::new(String::new(), String::new());
        if let Some(path) = &cli.log_path {
            settings.log_path = path.clone();
        }
        settings.follow = cli.follow;
        settings.init_containers = cli.init_containers;
        settings.log_options = LogOptions {
            container: None,
            since_seconds: since_seconds(cli.since.as_deref())?,
            tail_lines: tail_lines(cli.tail),
            follow: cli.follow,
        };
        Ok(settings)
    }
}

/// `logs/<YYYY-MM-DDTHH:MM>` in local time.
pub fn default_log_path() -> PathBuf {
    PathBuf::from("logs").join(chrono::Local::now().format("%Y-%m-%dT%H:%M").to_string())
}
