//! Time-window filter for scheduled episodes
//!
//! An episode is kept when its interval overlaps the open window
//! `(start, end)`: it ends strictly after the window opens and starts
//! strictly before the window closes.

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{RadioInfoError, Result};

/// Wire format of `starttimeutc` / `endtimeutc`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Acceptance interval for one update run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// `now - hours_before`
    pub start: DateTime<Utc>,
    /// `now + hours_after`
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Window reaching `hours_before` into the past and `hours_after` into
    /// the future of `now`.
    pub fn around(now: DateTime<Utc>, hours_before: u32, hours_after: u32) -> Self {
        Self {
            start: now - Duration::hours(i64::from(hours_before)),
            end: now + Duration::hours(i64::from(hours_after)),
        }
    }

    /// Whether an episode running from `start` to `end` overlaps the window.
    pub fn accepts(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        accepts(start, end, self.start, self.end)
    }

    /// Same as [`TimeWindow::accepts`] for raw wire timestamps.
    ///
    /// # Errors
    /// `RadioInfoError::TimeParseError` if either timestamp is malformed.
    pub fn accepts_timestamps(&self, start: &str, end: &str) -> Result<bool> {
        let start = parse_timestamp(start)?;
        let end = parse_timestamp(end)?;
        Ok(self.accepts(start, end))
    }
}

/// Overlap test between an episode interval and an open window.
pub fn accepts(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> bool {
    end > window_start && start < window_end
}

/// Parse a `yyyy-MM-ddTHH:mm:ssZ` timestamp as UTC.
///
/// # Examples
/// ```
/// use radioinfo_core::window::parse_timestamp;
///
/// let ts = parse_timestamp("2017-12-04T23:00:00Z").unwrap();
/// assert_eq!(ts.to_rfc3339(), "2017-12-04T23:00:00+00:00");
/// assert!(parse_timestamp("2017-12-04 23:00").is_err());
/// ```
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT)
        .map_err(|e| RadioInfoError::TimeParseError(format!("{value:?}: {e}")))?;
    Ok(Utc.from_utc_datetime(&naive))
}
