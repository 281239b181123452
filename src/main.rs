mod app;
mod cli;
mod config;
mod discovery;
mod error;
mod kubernetes;
mod notice;
mod picker;
mod pool;
mod registry;
mod sink;
mod summary;
mod types;
mod ui;
mod utils;

use clap::Parser;
use std::io::IsTerminal;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use app::Presentation;
use cli::Cli;

const LOG_FILE_NAME: &str = "klogs.log";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The dashboard only runs while following, and only on a terminal
    let use_tui = cli.follow && !cli.no_tui && std::io::stdout().is_terminal();

    // Initialize tracing subscriber - configure differently for TUI vs stdout mode
    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));

    if use_tui {
        // In TUI mode: write logs to a file to avoid corrupting the display
        let log_path = std::env::temp_dir().join(LOG_FILE_NAME);
        let writer = match std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
        {
            Ok(file) => BoxMakeWriter::new(std::sync::Mutex::new(file)),
            Err(_) => {
                eprintln!(
                    "Warning: Could not open {} for logging",
                    log_path.display()
                );
                BoxMakeWriter::new(std::io::sink)
            }
        };

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_ansi(false)
            .with_writer(writer)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    let presentation = if use_tui {
        Presentation::Dashboard
    } else {
        Presentation::Headless
    };

    app::run(cli, presentation).await
}
