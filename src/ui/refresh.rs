use chrono::{DateTime, Local};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::registry::{MonitoredPod, Registry};
use crate::sink::{LogSink, LogSize};

pub const SPINNER: [&str; 3] = [" .🚀", " ..🚀", " ...🚀"];

/// Pod tree as of the last status refresh.
#[derive(Debug, Clone, Default)]
pub struct StatusSnapshot {
    pub updated_at: Option<DateTime<Local>>,
    pub frame: usize,
    pub pods: Vec<MonitoredPod>,
}

impl StatusSnapshot {
    pub fn title(&self) -> String {
        let at = self
            .updated_at
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_default();
        format!("[{}] Monitoring{}", at, SPINNER[self.frame % SPINNER.len()])
    }
}

/// File sizes as of the last size refresh.
#[derive(Debug, Clone, Default)]
pub struct SizeSnapshot {
    pub updated_at: Option<DateTime<Local>>,
    pub rows: Vec<LogSize>,
}

/// Every `period` (first run immediately): publish the registry as it stands,
/// then advance freshness stages and evict terminated pods.
pub fn spawn_status_refresher(
    registry: Registry,
    period: Duration,
    tx: watch::Sender<StatusSnapshot>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut frame = 0;

        loop {
            ticker.tick().await;
            let pods = registry.tick();
            tx.send_replace(StatusSnapshot {
                updated_at: Some(Local::now()),
                frame,
                pods,
            });
            frame = (frame + 1) % SPINNER.len();
        }
    })
}

/// Every `period` (first run after one period): stat the indexed log files.
pub fn spawn_size_refresher(
    sink: LogSink,
    period: Duration,
    tx: watch::Sender<SizeSnapshot>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            // stat() is a blocking call, keep it off the async workers
            let sink = sink.clone();
            let rows = match tokio::task::spawn_blocking(move || sink.sizes()).await {
                Ok(rows) => rows,
                Err(_) => continue,
            };
            tx.send_replace(SizeSnapshot {
                updated_at: Some(Local::now()),
                rows,
            });
        }
    })
}
