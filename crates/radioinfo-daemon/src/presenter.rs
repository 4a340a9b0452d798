//! Presenter that reports through `tracing`

use radioinfo_core::{Channel, Presenter, UpdateSnapshot};
use tracing::{error, info, trace, Level};

/// Logs progress, results and errors
#[derive(Debug)]
pub struct LogPresenter {
    total: Option<u32>,
    current: u32,
    updates_enabled: bool,
}

impl Default for LogPresenter {
    fn default() -> Self {
        Self {
            total: None,
            current: 0,
            updates_enabled: true,
        }
    }
}

impl LogPresenter {
    /// Whether a progress display is currently open
    pub fn is_showing_progress(&self) -> bool {
        self.total.is_some()
    }

    /// Last progress numerator received
    pub fn current(&self) -> u32 {
        self.current
    }

    /// Whether a manual update may be requested right now
    pub fn updates_enabled(&self) -> bool {
        self.updates_enabled
    }
}

impl Presenter for LogPresenter {
    fn on_run_state(&mut self, running: bool) {
        self.updates_enabled = !running;
    }

    fn on_progress_start(&mut self, total: u32) {
        info!(total, "reading channels");
        self.total = Some(total);
        self.current = 0;
    }

    fn on_progress(&mut self, current: u32) {
        self.current = current;
        match self.total {
            Some(total) if current >= total => {
                info!(current, total, "all channels read");
                self.total = None;
            }
            Some(total) => info!(current, total, "channel read"),
            None => {}
        }
    }

    fn on_results_ready(&mut self, snapshot: &UpdateSnapshot, selected: Option<&Channel>) {
        for channel in &snapshot.channels {
            info!(
                channel = %channel.name,
                channel_type = channel.channel_type.as_deref().unwrap_or(""),
                episodes = channel.episodes.len(),
                "channel"
            );
        }
        if let Some(channel) = selected {
            for episode in &channel.episodes {
                info!(
                    channel = %channel.name,
                    title = %episode.title,
                    time = %episode.time_span_label(),
                    ended = snapshot.has_episode_ended(episode),
                    "episode"
                );
            }
        }
        if tracing::enabled!(Level::TRACE) {
            match serde_json::to_string(snapshot) {
                Ok(json) => trace!(%json, "snapshot"),
                Err(e) => trace!(error = %e, "snapshot not serializable"),
            }
        }
    }

    fn on_error(&mut self, message: &str) {
        self.total = None;
        error!(%message, "update failed");
    }
}
