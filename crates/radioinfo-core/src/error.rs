//! Error types for RadioInfo
//!
//! Every failure aborts the update run it happens in. `RadioInfoError`
//! implements Serialize so a presentation layer can forward it verbatim.

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Error type for RadioInfo operations
#[derive(Error, Debug)]
pub enum RadioInfoError {
    /// HTTP request failed (connection, timeout, body read)
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Invalid URL format
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Server answered with a non-success status
    #[error("Unexpected HTTP status {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    /// Document is not well-formed XML or misses a required field
    #[error("Failed to parse XML: {0}")]
    ParseError(String),

    /// Timestamp does not match `yyyy-MM-ddTHH:mm:ssZ`
    #[error("Invalid timestamp: {0}")]
    TimeParseError(String),

    /// Run was cancelled before it completed
    #[error("Update run was cancelled")]
    Cancelled,
}

/// Coarse classification of a [`RadioInfoError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    /// Network or URL failure
    Fetch,
    /// Structurally invalid document or non-numeric count
    Parse,
    /// Malformed timestamp
    TimeParse,
    /// Cooperative cancellation
    Cancelled,
}

impl RadioInfoError {
    /// Which of the fetch / parse / time-parse families this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RadioInfoError::HttpError(_)
            | RadioInfoError::InvalidUrl(_)
            | RadioInfoError::HttpStatus { .. } => ErrorKind::Fetch,
            RadioInfoError::ParseError(_) => ErrorKind::Parse,
            RadioInfoError::TimeParseError(_) => ErrorKind::TimeParse,
            RadioInfoError::Cancelled => ErrorKind::Cancelled,
        }
    }
}

impl From<roxmltree::Error> for RadioInfoError {
    fn from(err: roxmltree::Error) -> Self {
        RadioInfoError::ParseError(err.to_string())
    }
}

/// Serialize RadioInfoError as its display string
impl Serialize for RadioInfoError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Result type alias for RadioInfo operations
pub type Result<T> = std::result::Result<T, RadioInfoError>;
