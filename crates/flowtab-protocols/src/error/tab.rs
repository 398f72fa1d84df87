//! Tab source errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TabSourceError {
    #[error("Browser not available: {0}")]
    BrowserUnavailable(String),

    #[error("Tab not found: {0}")]
    TabNotFound(String),

    #[error("Tab operation failed: {0}")]
    OperationFailed(String),
}
