use std::path::PathBuf;

use thiserror::Error;

/// Boxed error coming from the cluster API (or a test double standing in for it).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(
        "kubeconfig error while reading {path}: {source}. Please provide a valid kubeconfig file with \"--kubeconfig <file_path>\""
    )]
    Kubeconfig {
        path: String,
        #[source]
        source: BoxError,
    },

    #[error("invalid duration '{0}' (expected something like 30s, 5m or 1h30m)")]
    InvalidDuration(String),

    #[error("failed to list pods in namespace {namespace}: {source}")]
    Listing {
        namespace: String,
        #[source]
        source: BoxError,
    },

    #[error("failed to open log stream for {pod}/{container}: {source}")]
    Stream {
        pod: String,
        container: String,
        #[source]
        source: BoxError,
    },

    #[error("namespace lookup failed: {0}")]
    Namespace(#[source] BoxError),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("prompt failed: {0}")]
    Prompt(#[source] std::io::Error),

    #[error("nothing to choose from for '{0}'")]
    EmptyChoice(String),

    #[error("work queue closed before pod {0} could be enqueued")]
    QueueClosed(String),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
