//! Data types for RadioInfo
//!
//! Channels and episodes are built by the schedule parser and are read-only
//! once they leave it. All types implement Serialize for the presentation
//! layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::window::TimeWindow;

/// Clock format used for episode start/end labels
const CLOCK_FORMAT: &str = "%H:%M:%S";

/// One scheduled program occurrence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    /// Episode title
    pub title: String,
    /// Free-text description, if the schedule carries one
    pub description: Option<String>,
    /// Start of the broadcast (UTC)
    pub start: DateTime<Utc>,
    /// End of the broadcast (UTC), never before `start`
    pub end: DateTime<Utc>,
    /// Episode image URL
    pub image_url: Option<String>,
}

impl Episode {
    /// Whether the episode was already over at `reference`.
    pub fn has_ended(&self, reference: DateTime<Utc>) -> bool {
        reference > self.end
    }

    /// Start time rendered as `HH:MM:SS`
    pub fn start_label(&self) -> String {
        self.start.format(CLOCK_FORMAT).to_string()
    }

    /// End time rendered as `HH:MM:SS`
    pub fn end_label(&self) -> String {
        self.end.format(CLOCK_FORMAT).to_string()
    }

    /// `"HH:MM:SS - HH:MM:SS"`
    pub fn time_span_label(&self) -> String {
        format!("{} - {}", self.start_label(), self.end_label())
    }
}

/// A radio station and the episodes it airs inside the run's window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    /// Channel name, unique within a snapshot
    pub name: String,
    /// Channel type (e.g. "Rikskanal", "Lokal kanal")
    pub channel_type: Option<String>,
    /// Episodes in page-then-document order
    pub episodes: Vec<Episode>,
}

impl Channel {
    /// Create a channel with no episodes
    pub fn new(name: impl Into<String>, channel_type: Option<String>) -> Self {
        Self {
            name: name.into(),
            channel_type,
            episodes: Vec::new(),
        }
    }

    /// First episode whose title equals `title`.
    pub fn episode(&self, title: &str) -> Option<&Episode> {
        self.episodes.iter().find(|episode| episode.title == title)
    }
}

/// Result of one successful update run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSnapshot {
    /// Reference time of the run
    pub now: DateTime<Utc>,
    /// Window the episodes were filtered against
    pub window: TimeWindow,
    /// Channels in document order
    pub channels: Vec<Channel>,
}

impl UpdateSnapshot {
    /// Channel whose name equals `name`.
    pub fn channel(&self, name: &str) -> Option<&Channel> {
        self.channels.iter().find(|channel| channel.name == name)
    }

    /// Whether `episode` had already ended when this snapshot was taken.
    pub fn has_episode_ended(&self, episode: &Episode) -> bool {
        episode.has_ended(self.now)
    }
}
