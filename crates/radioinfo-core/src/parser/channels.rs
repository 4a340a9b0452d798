//! Channel listing parser
//!
//! Extracts one [`ChannelEntry`] per `<channel>` element of a channel
//! listing page.

use roxmltree::Node;

use crate::error::{RadioInfoError, Result};
use crate::xml::element_text;

/// A `<channel>` element as it appears on a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelEntry {
    /// Value of the `name` attribute
    pub name: String,
    /// Text of `<channeltype>`
    pub channel_type: Option<String>,
    /// Text of `<scheduleurl>`; channels without one have no episodes
    pub schedule_url: Option<String>,
}

/// Parse a `<channel>` element.
///
/// # Errors
/// `RadioInfoError::ParseError` if the element has no `name` attribute.
pub fn parse_channel_entry(node: Node<'_, '_>) -> Result<ChannelEntry> {
    let name = node.attribute("name").ok_or_else(|| {
        RadioInfoError::ParseError(format!(
            "channel element without name attribute (id {:?})",
            node.attribute("id")
        ))
    })?;

    Ok(ChannelEntry {
        name: name.to_string(),
        channel_type: element_text(node, "channeltype"),
        schedule_url: element_text(node, "scheduleurl").filter(|url| !url.is_empty()),
    })
}
