//! Failures of a single product fetch.

use thiserror::Error;

/// Why a fetch cycle failed. The display text is what the view shows
/// after the region prefix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Request never produced a response (connection refused, DNS, ...)
    #[error("{0}")]
    Transport(String),

    /// Response arrived with a non-2xx status
    #[error("HTTP error! status: {0}")]
    Status(u16),

    /// Body was not JSON or not a list of products
    #[error("{0}")]
    Parse(String),
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Parse(err.to_string())
    }
}

impl From<wreq::Error> for FetchError {
    fn from(err: wreq::Error) -> Self {
        FetchError::Transport(err.to_string())
    }
}
