use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::app::AppContext;
use crate::error::{Error, Result};
use crate::types::{PodSummary, WorkItem};

/// Where candidate pods come from. Fixed for the whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryMode {
    /// Every pod in the namespace, re-listed each tick.
    All,
    /// Pods matching any of the selectors, re-listed each tick.
    ByLabels(Vec<String>),
    /// Pods picked by the operator at startup; admitted once.
    Interactive(Vec<PodSummary>),
}

pub struct Discovery {
    ctx: AppContext,
    mode: DiscoveryMode,
    queue: mpsc::Sender<WorkItem>,
}

impl Discovery {
    pub fn new(ctx: AppContext, mode: DiscoveryMode, queue: mpsc::Sender<WorkItem>) -> Self {
        Self { ctx, mode, queue }
    }

    /// Current candidate set for the configured mode.
    pub async fn candidates(&self) -> Result<Vec<PodSummary>> {
        let namespace = &self.ctx.settings.namespace;
        match &self.mode {
            DiscoveryMode::All => self.ctx.source.list_pods(namespace, None).await,
            DiscoveryMode::ByLabels(labels) => {
                let mut pods = Vec::new();
                for label in labels {
                    debug!("Listing pods with label {}", label);
                    pods.extend(self.ctx.source.list_pods(namespace, Some(label)).await?);
                }
                Ok(pods)
            }
            DiscoveryMode::Interactive(selected) => Ok(selected.clone()),
        }
    }

    /// Register and enqueue every running pod not seen before. Blocks while
    /// the queue is full. Returns how many pods were admitted.
    pub async fn admit(&self, pods: Vec<PodSummary>) -> Result<usize> {
        let mut admitted = 0;
        for pod in pods {
            if !pod.is_running() || !self.ctx.registry.admit(&pod.name) {
                continue;
            }

            self.ctx
                .notices
                .announce(format!("Found Pod: {}", pod.name), self.ctx.settings.notice_ttl);
            self.queue
                .send(pod)
                .await
                .map_err(|rejected| Error::QueueClosed(rejected.0.name))?;
            admitted += 1;
        }
        Ok(admitted)
    }

    /// List once and admit what is new.
    pub async fn tick(&self) -> Result<usize> {
        let pods = self.candidates().await?;
        self.admit(pods).await
    }

    /// Discover once (one-shot or interactive), or keep polling in follow
    /// mode. Listing errors end a one-shot run but are retried when following.
    pub async fn run(self) -> Result<()> {
        let once = !self.ctx.settings.follow || matches!(self.mode, DiscoveryMode::Interactive(_));
        if once {
            let admitted = self.tick().await?;
            if admitted == 0 {
                warn!(
                    "No running pods found in namespace {}",
                    self.ctx.settings.namespace
                );
            }
            return Ok(());
        }

        let mut ticker = tokio::time::interval(self.ctx.settings.discovery_period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut first = true;

        loop {
            ticker.tick().await;
            match self.tick().await {
                Ok(admitted) => {
                    if admitted > 0 {
                        info!("Admitted {} new pod(s)", admitted);
                    } else if first {
                        warn!(
                            "No running pods found in namespace {} yet, still watching",
                            self.ctx.settings.namespace
                        );
                    }
                }
                Err(err @ Error::QueueClosed(_)) => {
                    warn!("Discovery stopped: {}", err);
                    return Err(err);
                }
                Err(err) => {
                    warn!("Pod discovery failed, retrying next tick: {}", err);
                }
            }
            first = false;
        }
    }
}
