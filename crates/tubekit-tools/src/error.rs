//! Error types for tubekit-tools

use thiserror::Error;
use tubekit_core::QuotaExceeded;

/// Tool error type
#[derive(Debug, Error)]
pub enum Error {
    /// No tool registered under this name
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Referenced record or video does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Tool execution failed
    #[error("execution failed: {0}")]
    Execution(String),

    /// Invalid input
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Daily API quota would be exceeded
    #[error(transparent)]
    Quota(#[from] QuotaExceeded),
}

impl From<tubekit_youtube::Error> for Error {
    fn from(e: tubekit_youtube::Error) -> Self {
        match e {
            tubekit_youtube::Error::Quota(q) => Self::Quota(q),
            tubekit_youtube::Error::NotFound(what) => Self::NotFound(what),
            tubekit_youtube::Error::InvalidInput(msg) => Self::InvalidInput(msg),
            other => Self::Execution(other.to_string()),
        }
    }
}

impl From<tubekit_core::Error> for Error {
    fn from(e: tubekit_core::Error) -> Self {
        match e {
            tubekit_core::Error::NotFound(what) => Self::NotFound(what),
            tubekit_core::Error::InvalidInput(msg) => Self::InvalidInput(msg),
            other => Self::Execution(other.to_string()),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
