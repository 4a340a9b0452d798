//! Schedule parser
//!
//! Turns `<scheduledepisode>` elements into [`Episode`]s and drops the ones
//! that do not overlap the run's time window.

use roxmltree::Node;

use crate::error::{RadioInfoError, Result};
use crate::types::Episode;
use crate::window::{parse_timestamp, TimeWindow};
use crate::xml::element_text;

/// Parse a `<scheduledepisode>` element into a candidate episode.
///
/// # Errors
/// - `RadioInfoError::ParseError` - no `<title>`
/// - `RadioInfoError::TimeParseError` - missing or malformed
///   `<starttimeutc>` / `<endtimeutc>`, or an end before the start
pub fn parse_scheduled_episode(node: Node<'_, '_>) -> Result<Episode> {
    let title = element_text(node, "title").ok_or_else(|| {
        RadioInfoError::ParseError("scheduledepisode without title".to_string())
    })?;
    let start = parse_timestamp(&required_time(node, "starttimeutc", &title)?)?;
    let end = parse_timestamp(&required_time(node, "endtimeutc", &title)?)?;
    if end < start {
        return Err(RadioInfoError::TimeParseError(format!(
            "{title:?} ends ({end}) before it starts ({start})"
        )));
    }

    Ok(Episode {
        title,
        description: element_text(node, "description"),
        start,
        end,
        image_url: element_text(node, "imageurl"),
    })
}

/// Parse a `<scheduledepisode>` element and keep it only if it overlaps
/// `window`.
pub fn parse_episode_in_window(node: Node<'_, '_>, window: &TimeWindow) -> Result<Option<Episode>> {
    let episode = parse_scheduled_episode(node)?;
    Ok(window
        .accepts(episode.start, episode.end)
        .then_some(episode))
}

fn required_time(node: Node<'_, '_>, field: &str, title: &str) -> Result<String> {
    element_text(node, field)
        .ok_or_else(|| RadioInfoError::TimeParseError(format!("{title:?} has no {field}")))
}
