//! HTTP client for the schedule API
//!
//! One GET per page. There is no caching, retrying or throttling: every
//! failure is handed back to the caller, which aborts the run.

use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;
use tracing::debug;

use crate::error::{RadioInfoError, Result};

/// Default User-Agent sent with every request
const DEFAULT_USER_AGENT: &str = concat!("radioinfo/", env!("CARGO_PKG_VERSION"));

/// Configuration for the HTTP client
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
    /// User-Agent header value
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// HTTP client returning response bodies as text
///
/// Cloning is cheap; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct RadioClient {
    client: reqwest::Client,
}

impl RadioClient {
    /// Create a new client with default configuration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created
    pub fn new() -> Result<Self> {
        Self::with_config(&ClientConfig::default())
    }

    /// Create a new client with custom configuration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created
    pub fn with_config(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client })
    }

    /// Fetch the body of `url` as text.
    ///
    /// # Errors
    /// - `RadioInfoError::InvalidUrl` - `url` is not an absolute http(s) URL
    /// - `RadioInfoError::HttpError` - connection, timeout or body read failed
    /// - `RadioInfoError::HttpStatus` - server answered with a non-2xx status
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let parsed = parse_url(url)?;
        debug!(%parsed, "fetching page");

        let response = self.client.get(parsed).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RadioInfoError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

/// Validate that `url` is an absolute http(s) URL.
fn parse_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url.trim())
        .map_err(|e| RadioInfoError::InvalidUrl(format!("{url}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(RadioInfoError::InvalidUrl(format!(
            "{url}: unsupported scheme {scheme}"
        ))),
    }
}
