//! Content extraction errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Tab not reachable: {0}")]
    Unreachable(String),

    #[error("Script injection failed: {0}")]
    Injection(String),

    #[error("Extraction timed out after {0} seconds")]
    Timeout(u64),

    #[error("Invalid extraction reply: {0}")]
    InvalidReply(String),
}
