//! Element lookup helpers over `roxmltree` documents
//!
//! Lookups use first-match-by-tag-name over all descendants, so
//! `<pagination><totalpages>` and `<channel><channeltype>` are found no
//! matter how deeply they are nested.

use roxmltree::Node;

use crate::error::{RadioInfoError, Result};

/// First descendant element of `node` (including `node` itself) named `tag`.
pub fn first_element<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.descendants()
        .find(|n| n.is_element() && n.tag_name().name() == tag)
}

/// Concatenated text of `node` and all its descendants, trimmed.
pub fn text_content(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Text of the first descendant named `tag`, or `None` if there is none.
pub fn element_text(node: Node<'_, '_>, tag: &str) -> Option<String> {
    first_element(node, tag).map(text_content)
}

/// Parse a count field such as `totalpages` or `totalhits`.
///
/// # Errors
/// `RadioInfoError::ParseError` naming the field when `value` is not a
/// non-negative integer.
pub fn parse_count(field: &str, value: &str) -> Result<u32> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| RadioInfoError::ParseError(format!("{field} is not a number: {value:?}")))
}
