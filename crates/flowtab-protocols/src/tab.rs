//! Tab enumeration and content extraction protocols.

use async_trait::async_trait;

use crate::error::{ExtractionError, TabSourceError};
use crate::types::{ExtractionOutcome, TabId, TabInfo};

/// Source of open browser tabs.
#[async_trait]
pub trait TabSource: Send + Sync {
    /// List every open tab.
    async fn list_tabs(&self) -> Result<Vec<TabInfo>, TabSourceError>;

    /// Bring a tab (and its window) to the foreground.
    async fn activate(&self, tab: &TabInfo) -> Result<(), TabSourceError>;

    /// Close the given tabs.
    async fn close(&self, ids: &[TabId]) -> Result<(), TabSourceError>;
}

/// Pulls readable article text out of one tab.
///
/// Page-side failures come back as [`ExtractionOutcome::Error`]; transport
/// failures as [`ExtractionError`]. Callers skip the tab in both cases.
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    async fn extract(&self, tab: &TabInfo) -> Result<ExtractionOutcome, ExtractionError>;
}
