use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Default)]
struct Live {
    text: Option<String>,
    generation: u64,
}

/// User-facing messages: a short-lived banner shown on the dashboard and the
/// notes printed under the final summary.
#[derive(Clone, Default)]
pub struct Notices {
    live: Arc<Mutex<Live>>,
    notes: Arc<Mutex<Vec<String>>>,
}

impl Notices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `text` on the live banner and clear it after `ttl`, unless a newer
    /// message replaced it in the meantime. Must be called inside a runtime.
    pub fn announce(&self, text: impl Into<String>, ttl: Duration) {
        let text = text.into();
        info!("{}", text);

        let generation = {
            let mut live = self.live.lock();
            live.generation += 1;
            live.text = Some(text);
            live.generation
        };

        let live = Arc::clone(&self.live);
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            let mut live = live.lock();
            if live.generation == generation {
                live.text = None;
            }
        });
    }

    pub fn live(&self) -> Option<String> {
        self.live.lock().text.clone()
    }

    /// Keep a note for the end-of-run summary.
    pub fn note(&self, text: impl Into<String>) {
        let text = text.into();
        warn!("{}", text);
        self.notes.lock().push(text);
    }

    pub fn notes(&self) -> Vec<String> {
        self.notes.lock().clone()
    }
}
