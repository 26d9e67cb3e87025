//! Error types for tubekit-youtube

use thiserror::Error;
use tubekit_core::QuotaExceeded;

/// YouTube client error
#[derive(Debug, Error)]
pub enum Error {
    /// The daily quota would be exceeded
    #[error(transparent)]
    Quota(#[from] QuotaExceeded),

    /// Transport failure
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Non-success response from a Google API
    #[error("YouTube API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Message extracted from the error body
        message: String,
    },

    /// Requested resource does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// OAuth failure
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Bad argument
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// IO error (media files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Unexpected response shape
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
