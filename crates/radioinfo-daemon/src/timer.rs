//! Periodic update trigger

use std::time::Duration;

use radioinfo_core::UpdateController;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

/// Shortest interval the timer accepts
const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Starts an update run every `interval`, beginning immediately
///
/// A tick that finds a run still active is dropped, not queued.
pub struct UpdateTimer {
    controller: UpdateController,
    interval: Duration,
}

impl UpdateTimer {
    pub fn new(controller: UpdateController, interval: Duration) -> Self {
        Self {
            controller,
            interval: interval.max(MIN_INTERVAL),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Handle one tick; returns whether a run was started.
    pub fn tick(&self) -> bool {
        if self.controller.is_running() {
            warn!("previous update run still active, skipping scheduled run");
            return false;
        }
        self.controller.start_run().is_some()
    }

    /// Tick until the controller shuts down.
    pub async fn run(self) {
        let shutdown = self.controller.shutdown_token();
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    self.tick();
                }
            }
        }
        debug!("update timer stopped");
    }
}
