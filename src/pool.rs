use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::app::AppContext;
use crate::error::Result;
use crate::sink::{StreamEnd, write_stream};
use crate::types::WorkItem;

/// Drains the work queue and starts one capture task per container.
pub struct StreamingPool {
    ctx: AppContext,
    queue: mpsc::Receiver<WorkItem>,
}

impl StreamingPool {
    pub fn new(ctx: AppContext, queue: mpsc::Receiver<WorkItem>) -> Self {
        Self { ctx, queue }
    }

    /// Runs until every sender of the queue is dropped. Does not wait for the
    /// spawned tasks; they are tracked by the context's task tracker.
    pub async fn run(mut self) {
        while let Some(pod) = self.queue.recv().await {
            let spawned = self.dispatch(&pod);
            debug!("Started {} stream(s) for pod {}", spawned, pod.name);
        }
        debug!("Work queue closed");
    }

    /// Spawn capture tasks for the containers of `pod` (init containers
    /// first, when enabled). Returns the number of tasks spawned.
    pub fn dispatch(&self, pod: &WorkItem) -> usize {
        let init: &[String] = if self.ctx.settings.init_containers {
            pod.init_containers.as_slice()
        } else {
            &[]
        };

        let mut spawned = 0;
        for container in init.iter().chain(pod.containers.iter()) {
            if !self.ctx.registry.contains(&pod.name) {
                debug!("Pod {} left the registry, skipping {}", pod.name, container);
                continue;
            }
            self.ctx.tasks.spawn(capture_container(
                self.ctx.clone(),
                pod.name.clone(),
                container.clone(),
            ));
            spawned += 1;
        }
        spawned
    }
}

/// Task body: capture one container, escalating I/O failures.
pub async fn capture_container(ctx: AppContext, pod: String, container: String) {
    if let Err(err) = capture(&ctx, &pod, &container).await {
        ctx.report_fatal(err);
    }
}

async fn capture(ctx: &AppContext, pod: &str, container: &str) -> Result<()> {
    let options = ctx.settings.log_options.for_container(container);
    let opened = tokio::select! {
        _ = ctx.shutdown.cancelled() => return Ok(()),
        opened = ctx.source.stream_logs(&ctx.settings.namespace, pod, &options) => opened,
    };
    let stream = match opened {
        Ok(stream) => stream,
        Err(err) => {
            // The container simply stays out of the tree.
            debug!("Skipping {}/{}: {}", pod, container, err);
            return Ok(());
        }
    };

    let file = ctx.sink.create(pod, container).await?;
    ctx.registry.add_container(pod, container);
    info!("Streaming logs of {}/{}", pod, container);

    let path = ctx.sink.path_for(pod, container);
    let end = write_stream(stream, file, &path, &ctx.shutdown).await?;
    debug!("Stream of {}/{} ended ({:?})", pod, container, end);

    let reason = match end {
        StreamEnd::Eof => "",
        StreamEnd::ReadError => " (read error)",
        StreamEnd::Cancelled => return Ok(()),
    };
    if ctx.settings.follow && ctx.registry.terminate(pod) {
        ctx.notices.note(format!(
            "[{}] Streaming logs ended prematurely{}\n\tPod: {}\n\tContainer: {}",
            chrono::Local::now().format("%H:%M:%S"),
            reason,
            pod,
            container
        ));
    }
    Ok(())
}
