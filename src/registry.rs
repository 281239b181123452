use parking_lot::Mutex;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

/// How recently a monitored pod was confirmed active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Admitted and queued, no refresh has seen it yet.
    New,
    /// Seen by exactly one refresh.
    Fresh,
    /// Monitored for a while.
    Stale,
    /// A follow-mode stream ended; evicted on the next refresh.
    Terminated,
}

impl Stage {
    /// Stage after one refresh tick, `None` meaning the pod is evicted.
    pub fn advance(self) -> Option<Stage> {
        match self {
            Stage::New => Some(Stage::Fresh),
            Stage::Fresh | Stage::Stale => Some(Stage::Stale),
            Stage::Terminated => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Stage::New => "new",
            Stage::Fresh => "fresh",
            Stage::Stale => "stale",
            Stage::Terminated => "terminated",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitoredPod {
    pub name: String,
    pub stage: Stage,
    /// Containers whose stream has started, in start order.
    pub containers: Vec<String>,
}

#[derive(Default)]
struct Inner {
    pods: BTreeMap<String, MonitoredPod>,
    admitted: HashSet<String>,
}

/// Shared table of monitored pods. Every operation takes the lock once, so
/// check-and-modify sequences are atomic with respect to other tasks.
#[derive(Clone, Default)]
pub struct Registry {
    inner: Arc<Mutex<Inner>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` at [`Stage::New`]. Returns false if the name was
    /// admitted before, even if it has since been evicted.
    pub fn admit(&self, name: &str) -> bool {
        let mut inner = self.inner.lock();
        if !inner.admitted.insert(name.to_string()) {
            return false;
        }
        inner.pods.insert(
            name.to_string(),
            MonitoredPod {
                name: name.to_string(),
                stage: Stage::New,
                containers: Vec::new(),
            },
        );
        true
    }

    /// Record that a container of `pod` started streaming. Terminated pods
    /// keep an empty container list.
    pub fn add_container(&self, pod: &str, container: &str) -> bool {
        match self.inner.lock().pods.get_mut(pod) {
            Some(entry) if entry.stage != Stage::Terminated => {
                entry.containers.push(container.to_string());
                true
            }
            _ => false,
        }
    }

    /// Mark `pod` as terminated and drop its container list.
    pub fn terminate(&self, pod: &str) -> bool {
        match self.inner.lock().pods.get_mut(pod) {
            Some(entry) => {
                entry.stage = Stage::Terminated;
                entry.containers.clear();
                true
            }
            None => false,
        }
    }

    /// One refresh: returns the pods as they stand (sorted by name), then
    /// advances each stage and evicts terminated pods.
    pub fn tick(&self) -> Vec<MonitoredPod> {
        let mut inner = self.inner.lock();
        let snapshot: Vec<MonitoredPod> = inner.pods.values().cloned().collect();
        inner.pods.retain(|_, pod| match pod.stage.advance() {
            Some(next) => {
                pod.stage = next;
                true
            }
            None => false,
        });
        snapshot
    }

    pub fn contains(&self, pod: &str) -> bool {
        self.inner.lock().pods.contains_key(pod)
    }
}
