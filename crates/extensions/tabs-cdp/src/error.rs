//! CDP error types.

use flowtab_protocols::{ExtractionError, TabSourceError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CdpError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Chrome not running with remote debugging.
    #[error("Chrome not available at {0}. Start Chrome with: chrome --remote-debugging-port=9222")]
    ChromeNotAvailable(String),

    #[error("WebSocket error: {0}")]
    WebSocket(String),

    #[error("CDP error: {message} (code: {code})")]
    Protocol { code: i64, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("JavaScript error: {0}")]
    JavaScript(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Session closed")]
    SessionClosed,
}

impl From<tokio_tungstenite::tungstenite::Error> for CdpError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        CdpError::WebSocket(e.to_string())
    }
}

impl From<reqwest::Error> for CdpError {
    fn from(e: reqwest::Error) -> Self {
        CdpError::Http(e.to_string())
    }
}

impl From<CdpError> for TabSourceError {
    fn from(e: CdpError) -> Self {
        match e {
            CdpError::ChromeNotAvailable(endpoint) => TabSourceError::BrowserUnavailable(endpoint),
            CdpError::PageNotFound(id) => TabSourceError::TabNotFound(id),
            other => TabSourceError::OperationFailed(other.to_string()),
        }
    }
}

impl From<CdpError> for ExtractionError {
    fn from(e: CdpError) -> Self {
        match e {
            CdpError::PageNotFound(id) => ExtractionError::Unreachable(id),
            CdpError::JavaScript(msg) => ExtractionError::Injection(msg),
            CdpError::Serialization(e) => ExtractionError::InvalidReply(e.to_string()),
            other => ExtractionError::Unreachable(other.to_string()),
        }
    }
}
