//! Update run controller
//!
//! [`UpdateController`] runs the fetch → parse → filter pipeline on a Tokio
//! task, at most one run at a time, and swaps the finished channel
//! collection in as a whole. Everything a presentation layer needs to hear
//! about travels as [`UpdateEvent`]s over one channel, in order:
//!
//! ```text
//! RunStarted, ProgressStarted { total }, Progress { current }*, ResultsReady | Failed
//! ```
//!
//! `ResultsReady` / `Failed` is always the last event of a run. A cancelled
//! run stops emitting events as soon as the cancellation is observed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::client::RadioClient;
use crate::config::UpdateConfig;
use crate::error::{ErrorKind, RadioInfoError, Result};
use crate::parser::{Progress, ScheduleParser};
use crate::types::{Channel, Episode, UpdateSnapshot};
use crate::window::TimeWindow;

/// Notification from an update run to the presentation layer
#[derive(Debug, Clone)]
pub enum UpdateEvent {
    /// A run has started; manual updates should be disabled until it ends
    RunStarted,
    /// Number of channels the run will read
    ProgressStarted { total: u32 },
    /// Number of channels read so far
    Progress { current: u32 },
    /// The run finished and `snapshot` is now the current snapshot
    ResultsReady { snapshot: Arc<UpdateSnapshot> },
    /// The run failed; the previous snapshot is still current
    Failed { message: String, kind: ErrorKind },
}

/// Receiving side of a presentation layer
///
/// Calls arrive on whichever task drives [`EventReceiver::run`] and never
/// concurrently.
pub trait Presenter {
    /// A run started (`true`) or ended (`false`)
    fn on_run_state(&mut self, _running: bool) {}

    /// Progress denominator of a new run
    fn on_progress_start(&mut self, total: u32);

    /// Channels completed so far; reaching the total ends the progress display
    fn on_progress(&mut self, current: u32);

    /// New results, with the selected channel resolved against them
    fn on_results_ready(&mut self, snapshot: &UpdateSnapshot, selected: Option<&Channel>);

    /// A run failed with `message`
    fn on_error(&mut self, message: &str);
}

/// Owns the single-flight guard, the current snapshot and the selection
///
/// Cloning is cheap; clones share state.
#[derive(Debug, Clone)]
pub struct UpdateController {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    config: UpdateConfig,
    parser: ScheduleParser,
    running: AtomicBool,
    snapshot: RwLock<Option<Arc<UpdateSnapshot>>>,
    selection: RwLock<Option<String>>,
    shutdown: CancellationToken,
    events: mpsc::UnboundedSender<UpdateEvent>,
}

/// Clears the running flag when a run ends, however it ends
struct RunGuard(Arc<Inner>);

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.0.running.store(false, Ordering::Release);
    }
}

impl UpdateController {
    /// Create a controller and the receiver its events are delivered to.
    ///
    /// `config.initial_channel`, if set, becomes the initial selection.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created
    pub fn new(config: UpdateConfig) -> Result<(Self, EventReceiver)> {
        let client = RadioClient::with_config(&config.client)?;
        Ok(Self::with_client(config, client))
    }

    /// Create a controller around a pre-configured client.
    pub fn with_client(config: UpdateConfig, client: RadioClient) -> (Self, EventReceiver) {
        let (events, rx) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();
        let selection = config.initial_channel.clone();
        let inner = Arc::new(Inner {
            config,
            parser: ScheduleParser::new(client),
            running: AtomicBool::new(false),
            snapshot: RwLock::new(None),
            selection: RwLock::new(selection),
            shutdown: shutdown.clone(),
            events,
        });
        (Self { inner }, EventReceiver { rx, shutdown })
    }

    /// Start an update run in the background.
    ///
    /// Returns `None` without doing anything if a run is already active or
    /// the controller has been shut down. Must be called from within a Tokio
    /// runtime.
    pub fn start_run(&self) -> Option<JoinHandle<()>> {
        if self.inner.shutdown.is_cancelled() {
            debug!("controller shut down, ignoring update request");
            return None;
        }
        if self
            .inner
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("update run already active, ignoring update request");
            return None;
        }

        let guard = RunGuard(Arc::clone(&self.inner));
        let inner = Arc::clone(&self.inner);
        let cancel = self.inner.shutdown.child_token();
        let now = Utc::now();
        Some(tokio::spawn(async move {
            inner.execute(now, cancel, guard).await;
        }))
    }

    /// Whether a run is currently active
    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::Acquire)
    }

    /// Snapshot of the last successful run, if any.
    pub fn snapshot(&self) -> Option<Arc<UpdateSnapshot>> {
        self.inner
            .snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remember `name` as the selected channel.
    pub fn select_channel(&self, name: impl Into<String>) {
        *self
            .inner
            .selection
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(name.into());
    }

    /// Name of the selected channel
    pub fn selection(&self) -> Option<String> {
        self.inner
            .selection
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn has_selected_channel(&self) -> bool {
        self.selection().is_some()
    }

    /// The selected channel as it appears in the current snapshot.
    pub fn selected_channel(&self) -> Option<Channel> {
        let name = self.selection()?;
        self.snapshot()?.channel(&name).cloned()
    }

    /// Episode of the selected channel whose title equals `title`.
    pub fn selected_episode(&self, title: &str) -> Option<Episode> {
        self.selected_channel()?.episode(title).cloned()
    }

    /// Cancel the active run, if any, and refuse all future runs.
    pub fn shutdown(&self) {
        info!("shutting down update controller");
        self.inner.shutdown.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.shutdown.is_cancelled()
    }

    /// Token cancelled by [`UpdateController::shutdown`]
    pub fn shutdown_token(&self) -> CancellationToken {
        self.inner.shutdown.clone()
    }

    pub fn config(&self) -> &UpdateConfig {
        &self.inner.config
    }
}

impl Inner {
    async fn execute(self: Arc<Self>, now: DateTime<Utc>, cancel: CancellationToken, guard: RunGuard) {
        let window = TimeWindow::around(now, self.config.hours_before, self.config.hours_after);
        info!(
            window_start = %window.start,
            window_end = %window.end,
            url = %self.config.base_url,
            "update run started"
        );
        self.emit(&cancel, UpdateEvent::RunStarted);

        let parse = self
            .parser
            .parse_channels(&self.config.base_url, window, |progress| {
                let event = match progress {
                    Progress::Started { total } => UpdateEvent::ProgressStarted { total },
                    Progress::Advanced { completed } => UpdateEvent::Progress { current: completed },
                };
                self.emit(&cancel, event);
            });

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(RadioInfoError::Cancelled),
            result = parse => result,
        };

        if cancel.is_cancelled() {
            info!("update run cancelled");
            drop(guard);
            return;
        }

        match outcome {
            Ok(channels) => {
                let snapshot = Arc::new(UpdateSnapshot {
                    now,
                    window,
                    channels,
                });
                *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) =
                    Some(Arc::clone(&snapshot));
                info!(channels = snapshot.channels.len(), "update run finished");
                self.emit(&cancel, UpdateEvent::ResultsReady { snapshot });
            }
            Err(err) => {
                warn!(error = %err, "update run failed");
                self.emit(
                    &cancel,
                    UpdateEvent::Failed {
                        message: err.to_string(),
                        kind: err.kind(),
                    },
                );
            }
        }
        drop(guard);
    }

    fn emit(&self, cancel: &CancellationToken, event: UpdateEvent) {
        if cancel.is_cancelled() {
            return;
        }
        // The receiver may be gone; runs keep going without an audience.
        let _ = self.events.send(event);
    }
}

/// Delivery end of the controller's event channel
#[derive(Debug)]
pub struct EventReceiver {
    rx: mpsc::UnboundedReceiver<UpdateEvent>,
    shutdown: CancellationToken,
}

impl EventReceiver {
    /// Next event; `None` once every controller handle is gone.
    pub async fn recv(&mut self) -> Option<UpdateEvent> {
        self.rx.recv().await
    }

    /// Next event if one is already queued.
    pub fn try_recv(&mut self) -> Option<UpdateEvent> {
        self.rx.try_recv().ok()
    }

    /// Deliver events to `presenter` until the controller shuts down or is
    /// dropped.
    ///
    /// Events queued before shutdown are still delivered; runs stop
    /// emitting once shutdown is observed, so the backlog is finite.
    pub async fn run<P: Presenter>(mut self, controller: &UpdateController, presenter: &mut P) {
        loop {
            let event = tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => {
                    while let Some(event) = self.try_recv() {
                        dispatch(event, controller, presenter);
                    }
                    break;
                }
                event = self.rx.recv() => event,
            };
            match event {
                Some(event) => dispatch(event, controller, presenter),
                None => break,
            }
        }
    }
}

/// Hand one event to `presenter`.
pub fn dispatch<P: Presenter>(event: UpdateEvent, controller: &UpdateController, presenter: &mut P) {
    match event {
        UpdateEvent::RunStarted => presenter.on_run_state(true),
        UpdateEvent::ProgressStarted { total } => presenter.on_progress_start(total),
        UpdateEvent::Progress { current } => presenter.on_progress(current),
        UpdateEvent::ResultsReady { snapshot } => {
            let selected = controller
                .selection()
                .and_then(|name| snapshot.channel(&name));
            presenter.on_results_ready(&snapshot, selected);
            presenter.on_run_state(false);
        }
        UpdateEvent::Failed { message, .. } => {
            presenter.on_error(&message);
            presenter.on_run_state(false);
        }
    }
}
