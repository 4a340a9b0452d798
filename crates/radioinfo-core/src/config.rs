//! Configuration for update runs
//!
//! Defaults match the public Sveriges Radio API. Every field can be
//! overridden from the environment with [`UpdateConfig::from_env`].

use std::time::Duration;

use serde::Deserialize;

use crate::client::ClientConfig;
use crate::error::{RadioInfoError, Result};

/// Channel listing of the Sveriges Radio open API
pub const DEFAULT_BASE_URL: &str = "http://api.sr.se/api/v2/channels";

/// Configuration of the update controller
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpdateConfig {
    /// URL of the first channel listing page
    pub base_url: String,
    /// Hours before the run's reference time episodes are kept from (default: 12)
    pub hours_before: u32,
    /// Hours after the run's reference time episodes are kept until (default: 12)
    pub hours_after: u32,
    /// Seconds between timer-triggered runs (default: 3600)
    pub update_interval_secs: u64,
    /// Channel selected before the first run, by name
    pub initial_channel: Option<String>,
    /// HTTP client settings
    pub client: ClientConfig,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            hours_before: 12,
            hours_after: 12,
            update_interval_secs: 3600,
            initial_channel: None,
            client: ClientConfig::default(),
        }
    }
}

impl UpdateConfig {
    /// Default configuration overlaid with `RADIOINFO_*` environment
    /// variables.
    ///
    /// # Errors
    /// `RadioInfoError::ParseError` if a numeric variable is not an integer.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`UpdateConfig::from_env`] with a custom variable source.
    pub fn from_lookup<L>(lookup: L) -> Result<Self>
    where
        L: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(url) = lookup("RADIOINFO_BASE_URL") {
            config.base_url = url;
        }
        if let Some(value) = lookup("RADIOINFO_HOURS_BEFORE") {
            config.hours_before = parse_var("RADIOINFO_HOURS_BEFORE", &value)?;
        }
        if let Some(value) = lookup("RADIOINFO_HOURS_AFTER") {
            config.hours_after = parse_var("RADIOINFO_HOURS_AFTER", &value)?;
        }
        if let Some(value) = lookup("RADIOINFO_UPDATE_INTERVAL_SECS") {
            config.update_interval_secs = parse_var("RADIOINFO_UPDATE_INTERVAL_SECS", &value)?;
        }
        if let Some(channel) = lookup("RADIOINFO_CHANNEL").filter(|name| !name.trim().is_empty()) {
            config.initial_channel = Some(channel);
        }
        if let Some(value) = lookup("RADIOINFO_TIMEOUT_SECS") {
            config.client.timeout_secs = parse_var("RADIOINFO_TIMEOUT_SECS", &value)?;
        }
        Ok(config)
    }

    /// Interval between timer-triggered runs
    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(self.update_interval_secs)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| RadioInfoError::ParseError(format!("{key} is not a number: {value:?}")))
}
