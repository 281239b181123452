use futures::io::AsyncReadExt;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{Error, Result};
use crate::notice::Notices;
use crate::types::LogStream;

/// Joins pod and container names in a log file name. Neither Kubernetes pod
/// names nor container names may contain it.
pub const FILE_NAME_SEPARATOR: &str = "__";
pub const LOG_SUFFIX: &str = ".log";

const COPY_BUFFER_SIZE: usize = 32 * 1024;

/// `<pod>__<container>.log`
pub fn log_file_name(pod: &str, container: &str) -> String {
    format!("{}{}{}{}", pod, FILE_NAME_SEPARATOR, container, LOG_SUFFIX)
}

/// Inverse of [`log_file_name`].
pub fn split_log_file_name(file_name: &str) -> Option<(&str, &str)> {
    let (pod, rest) = file_name.split_once(FILE_NAME_SEPARATOR)?;
    Some((pod, rest.strip_suffix(LOG_SUFFIX).unwrap_or(rest)))
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LogKey {
    pub pod: String,
    pub container: String,
}

/// One row of the size report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSize {
    pub pod: String,
    pub container: String,
    pub bytes: u64,
    /// Same pod as the previous row, rendered dimmed.
    pub repeated_pod: bool,
}

/// How a copy ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnd {
    Eof,
    ReadError,
    /// The run is shutting down; the stream itself is still open.
    Cancelled,
}

/// Owns the on-disk log files and the index used for size reporting.
#[derive(Clone)]
pub struct LogSink {
    root: PathBuf,
    files: Arc<Mutex<BTreeMap<LogKey, File>>>,
    notices: Notices,
}

impl LogSink {
    pub fn new(root: impl Into<PathBuf>, notices: Notices) -> Self {
        Self {
            root: root.into(),
            files: Arc::new(Mutex::new(BTreeMap::new())),
            notices,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, pod: &str, container: &str) -> PathBuf {
        self.root.join(log_file_name(pod, container))
    }

    /// Open (creating if needed) the append-mode file for a container and
    /// record it in the index. Returns a handle for the single writer.
    pub async fn create(&self, pod: &str, container: &str) -> Result<File> {
        let sink = self.clone();
        let path = self.path_for(pod, container);
        let (pod, container) = (pod.to_string(), container.to_string());
        tokio::task::spawn_blocking(move || sink.open_blocking(&pod, &container))
            .await
            .map_err(|e| Error::io(path, std::io::Error::other(e)))?
    }

    fn open_blocking(&self, pod: &str, container: &str) -> Result<File> {
        fs::create_dir_all(&self.root).map_err(|e| Error::io(&self.root, e))?;

        let path = self.path_for(pod, container);
        if path.exists() {
            self.notices
                .note(format!("File {} exists. Appending.", path.display()));
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| Error::io(&path, e))?;
        let writer = file.try_clone().map_err(|e| Error::io(&path, e))?;

        self.files.lock().insert(
            LogKey {
                pod: pod.to_string(),
                container: container.to_string(),
            },
            file,
        );
        debug!("Writing {}", path.display());
        Ok(writer)
    }

    /// Current size of every indexed file, grouped by pod. Files that cannot
    /// be stat'ed are left out of the report.
    pub fn sizes(&self) -> Vec<LogSize> {
        let stats: Vec<(LogKey, u64)> = {
            let files = self.files.lock();
            files
                .iter()
                .filter_map(|(key, file)| file.metadata().ok().map(|m| (key.clone(), m.len())))
                .collect()
        };

        let mut previous: Option<String> = None;
        stats
            .into_iter()
            .map(|(key, bytes)| {
                let repeated_pod = previous.as_deref() == Some(key.pod.as_str());
                previous = Some(key.pod.clone());
                LogSize {
                    pod: key.pod,
                    container: key.container,
                    bytes,
                    repeated_pod,
                }
            })
            .collect()
    }
}

/// Copy `stream` into `file` until the stream ends or `cancel` fires. Every
/// chunk is flushed before the next read. Read failures end the copy like EOF
/// does; write failures are returned.
pub async fn write_stream(
    mut stream: LogStream<'_>,
    file: File,
    path: &Path,
    cancel: &CancellationToken,
) -> Result<StreamEnd> {
    let mut writer = tokio::fs::File::from_std(file);
    let mut buf = vec![0u8; COPY_BUFFER_SIZE];

    let end = loop {
        let read = tokio::select! {
            _ = cancel.cancelled() => None,
            read = stream.read(&mut buf) => Some(read),
        };
        let n = match read {
            None => break StreamEnd::Cancelled,
            Some(Ok(0)) => break StreamEnd::Eof,
            Some(Ok(n)) => n,
            Some(Err(e)) => {
                debug!("Reading log stream for {} failed: {}", path.display(), e);
                break StreamEnd::ReadError;
            }
        };
        writer
            .write_all(&buf[..n])
            .await
            .map_err(|e| Error::io(path, e))?;
        writer.flush().await.map_err(|e| Error::io(path, e))?;
    };

    writer.flush().await.map_err(|e| Error::io(path, e))?;
    Ok(end)
}
