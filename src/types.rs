use futures::io::AsyncBufRead;
use std::pin::Pin;

/// Pod phase reported by the API server for pods whose containers are up.
pub const PHASE_RUNNING: &str = "Running";

/// The parts of a pod the monitor cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodSummary {
    pub name: String,
    pub phase: String,
    pub ready: bool,
    pub containers: Vec<String>,
    pub init_containers: Vec<String>,
}

impl PodSummary {
    pub fn is_running(&self) -> bool {
        self.phase == PHASE_RUNNING
    }
}

/// A pod admitted for streaming, carried once through the work queue.
pub type WorkItem = PodSummary;

/// Options passed to the log endpoint for one container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogOptions {
    pub container: Option<String>,
    pub since_seconds: Option<i64>,
    pub tail_lines: Option<i64>,
    pub follow: bool,
}

impl LogOptions {
    pub fn for_container(&self, container: &str) -> Self {
        Self {
            container: Some(container.to_string()),
            ..self.clone()
        }
    }
}

/// Raw log bytes of a single container.
pub type LogStream<'a> = Pin<Box<dyn AsyncBufRead + Send + 'a>>;
