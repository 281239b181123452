use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

use crate::cli::Cli;
use crate::config::{SHUTDOWN_GRACE, Settings};
use crate::discovery::{Discovery, DiscoveryMode};
use crate::error::{Error, Result};
use crate::kubernetes::{KubePodSource, PodSource};
use crate::notice::Notices;
use crate::picker;
use crate::pool::StreamingPool;
use crate::registry::Registry;
use crate::sink::LogSink;
use crate::summary::print_summary;
use crate::ui::refresh::{spawn_size_refresher, spawn_status_refresher};
use crate::ui::{self, AppEvent, Dashboard, SizeSnapshot, StatusSnapshot};

/// Shared handles passed to every component of a run.
#[derive(Clone)]
pub struct AppContext {
    pub source: Arc<dyn PodSource>,
    pub settings: Arc<Settings>,
    pub registry: Registry,
    pub sink: LogSink,
    pub notices: Notices,
    /// Capture tasks in flight; waited on before a one-shot run exits.
    pub tasks: TaskTracker,
    /// Fired when a follow run ends; capture tasks stop after their current chunk.
    pub shutdown: CancellationToken,
    fatal: mpsc::UnboundedSender<Error>,
}

impl AppContext {
    /// Build a context and the receiving end of its fatal-error channel.
    pub fn new(
        source: Arc<dyn PodSource>,
        settings: Settings,
    ) -> (Self, mpsc::UnboundedReceiver<Error>) {
        let (fatal, fatal_rx) = mpsc::unbounded_channel();
        let notices = Notices::new();
        let sink = LogSink::new(settings.log_path.clone(), notices.clone());
        let ctx = Self {
            source,
            settings: Arc::new(settings),
            registry: Registry::new(),
            sink,
            notices,
            tasks: TaskTracker::new(),
            shutdown: CancellationToken::new(),
            fatal,
        };
        (ctx, fatal_rx)
    }

    /// Hand an unrecoverable error to the orchestrator.
    pub fn report_fatal(&self, err: Error) {
        warn!("Fatal: {}", err);
        let _ = self.fatal.send(err);
    }
}

/// How follow mode shows progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    Dashboard,
    Headless,
}

/// Entry point after argument parsing.
pub async fn run(cli: Cli, presentation: Presentation) -> anyhow::Result<()> {
    let mut settings = Settings::from_cli(&cli)?;

    let connection = KubePodSource::connect(cli.kubeconfig.as_deref()).await?;
    let source: Arc<dyn PodSource> = Arc::new(connection.source);
    let namespace = resolve_namespace(
        source.as_ref(),
        cli.namespace.as_deref(),
        &connection.default_namespace,
    )
    .await?;
    info!("Using Context {}", connection.context);
    info!("Using Namespace {}", namespace);

    settings.context = connection.context;
    settings.namespace = namespace;

    let mode = discovery_mode(&cli, source.as_ref(), &settings.namespace).await?;
    let follow = settings.follow;
    let (ctx, fatal_rx) = AppContext::new(source, settings);

    let result = if follow {
        run_follow(ctx.clone(), mode, fatal_rx, presentation).await
    } else {
        run_once(ctx.clone(), mode, fatal_rx)
            .await
            .map_err(anyhow::Error::from)
    };

    print_summary(&ctx.sink, &ctx.notices);
    result
}

/// Explicit namespace, else the kubeconfig default. Falls back to a prompt if
/// the namespace does not exist.
pub async fn resolve_namespace(
    source: &dyn PodSource,
    requested: Option<&str>,
    fallback: &str,
) -> Result<String> {
    let namespace = requested
        .filter(|ns| !ns.is_empty())
        .unwrap_or(fallback)
        .to_string();

    if source.namespace_exists(&namespace).await? {
        return Ok(namespace);
    }

    warn!("Namespace {} not found", namespace);
    let mut namespaces = source.list_namespaces().await?;
    namespaces.sort();
    picker::select_one("Select a Namespace", &namespaces).await
}

async fn discovery_mode(
    cli: &Cli,
    source: &dyn PodSource,
    namespace: &str,
) -> Result<DiscoveryMode> {
    if cli.all_pods {
        info!("Getting all Pods");
        return Ok(DiscoveryMode::All);
    }
    if !cli.labels.is_empty() {
        for label in &cli.labels {
            info!("Getting Pods with label {}", label);
        }
        return Ok(DiscoveryMode::ByLabels(cli.labels.clone()));
    }

    let mut ready: Vec<_> = source
        .list_pods(namespace, None)
        .await?
        .into_iter()
        .filter(|pod| pod.ready)
        .collect();
    ready.sort_by(|a, b| a.name.cmp(&b.name));
    if ready.is_empty() {
        warn!("No pods found in namespace {}", namespace);
        return Ok(DiscoveryMode::Interactive(Vec::new()));
    }

    let names: Vec<String> = ready.iter().map(|p| p.name.clone()).collect();
    let chosen = picker::select_many("Select Pods to get logs", &names).await?;
    if chosen.is_empty() {
        warn!("No pods selected");
    }
    ready.retain(|pod| chosen.contains(&pod.name));
    Ok(DiscoveryMode::Interactive(ready))
}

/// Discover once, stream everything to EOF, return.
pub async fn run_once(
    ctx: AppContext,
    mode: DiscoveryMode,
    mut fatal_rx: mpsc::UnboundedReceiver<Error>,
) -> Result<()> {
    let (queue_tx, queue_rx) = mpsc::channel(ctx.settings.queue_capacity);
    let pool = tokio::spawn(StreamingPool::new(ctx.clone(), queue_rx).run());

    // Dropping the discovery closes the queue, which ends the pool.
    let discovered = Discovery::new(ctx.clone(), mode, queue_tx).run().await;
    if let Err(err) = pool.await {
        warn!("Streaming pool stopped abnormally: {}", err);
    }

    ctx.tasks.close();
    tokio::select! {
        _ = ctx.tasks.wait() => {}
        Some(err) = fatal_rx.recv() => return Err(err),
    }
    if let Ok(err) = fatal_rx.try_recv() {
        return Err(err);
    }
    debug!("All streams finished");
    discovered
}

/// Keep discovering and streaming until the operator stops the run.
pub async fn run_follow(
    ctx: AppContext,
    mode: DiscoveryMode,
    fatal_rx: mpsc::UnboundedReceiver<Error>,
    presentation: Presentation,
) -> anyhow::Result<()> {
    let (queue_tx, queue_rx) = mpsc::channel(ctx.settings.queue_capacity);
    let pool = tokio::spawn(StreamingPool::new(ctx.clone(), queue_rx).run());
    let discovery = tokio::spawn(Discovery::new(ctx.clone(), mode, queue_tx).run());

    let (status_tx, status_rx) = watch::channel(StatusSnapshot::default());
    let (size_tx, size_rx) = watch::channel(SizeSnapshot::default());
    let status = spawn_status_refresher(ctx.registry.clone(), ctx.settings.status_period, status_tx);
    let sizes = spawn_size_refresher(ctx.sink.clone(), ctx.settings.size_period, size_tx);

    let result = match presentation {
        Presentation::Dashboard => run_dashboard(&ctx, status_rx, size_rx, fatal_rx).await,
        Presentation::Headless => run_headless(status_rx, fatal_rx).await,
    };

    status.abort();
    sizes.abort();
    discovery.abort();
    pool.abort();
    stop_captures(&ctx).await;
    result
}

/// Ask every capture task to stop and wait for their last writes.
pub async fn stop_captures(ctx: &AppContext) {
    ctx.shutdown.cancel();
    ctx.tasks.close();
    if tokio::time::timeout(SHUTDOWN_GRACE, ctx.tasks.wait())
        .await
        .is_err()
    {
        warn!(
            "{} stream(s) still busy after {:?}",
            ctx.tasks.len(),
            SHUTDOWN_GRACE
        );
    }
}

async fn run_dashboard(
    ctx: &AppContext,
    status_rx: watch::Receiver<StatusSnapshot>,
    size_rx: watch::Receiver<SizeSnapshot>,
    mut fatal_rx: mpsc::UnboundedReceiver<Error>,
) -> anyhow::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(100);
    let events = tokio::spawn(ui::events::event_loop(event_tx));

    let mut dashboard = Dashboard::new(&ctx.settings.context, &ctx.settings.namespace);
    let mut render_interval = tokio::time::interval(Duration::from_millis(250));
    render_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result: anyhow::Result<()> = loop {
        tokio::select! {
            _ = render_interval.tick() => {
                dashboard.update(
                    status_rx.borrow().clone(),
                    size_rx.borrow().clone(),
                    ctx.notices.live(),
                );
                if let Err(err) = ui::renderer::render(&mut terminal, &dashboard) {
                    break Err(err.into());
                }
            }
            Some(event) = event_rx.recv() => match event {
                AppEvent::Key(key) => {
                    if !ui::events::handle_key_event(key) {
                        break Ok(());
                    }
                }
                AppEvent::Resize => {
                    if let Err(err) = ui::renderer::render(&mut terminal, &dashboard) {
                        break Err(err.into());
                    }
                }
            },
            Some(err) = fatal_rx.recv() => break Err(err.into()),
        }
    };

    // Cleanup terminal
    events.abort();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_headless(
    mut status_rx: watch::Receiver<StatusSnapshot>,
    mut fatal_rx: mpsc::UnboundedReceiver<Error>,
) -> anyhow::Result<()> {
    let mut last_seen: Vec<(String, crate::registry::Stage)> = Vec::new();

    loop {
        tokio::select! {
            changed = status_rx.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
                let snapshot = status_rx.borrow_and_update().clone();
                let current: Vec<_> = snapshot
                    .pods
                    .iter()
                    .map(|p| (p.name.clone(), p.stage))
                    .collect();
                let names: Vec<&str> = current.iter().map(|(n, _)| n.as_str()).collect();
                let previous: Vec<&str> = last_seen.iter().map(|(n, _)| n.as_str()).collect();
                if names != previous {
                    info!("Monitoring {} pod(s): {}", names.len(), names.join(", "));
                }
                let stages: Vec<String> = current
                    .iter()
                    .map(|(name, stage)| format!("{} ({})", name, stage.label()))
                    .collect();
                debug!("{} {}", snapshot.title(), stages.join(", "));
                last_seen = current;
            }
            Some(err) = fatal_rx.recv() => return Err(err.into()),
            signal = tokio::signal::ctrl_c() => {
                signal?;
                return Ok(());
            }
        }
    }
}
