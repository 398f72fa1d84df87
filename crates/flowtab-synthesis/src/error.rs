//! Dashboard errors.

use flowtab_protocols::{ProviderError, TabSourceError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Please configure an API key")]
    MissingApiKey,

    #[error("No content could be extracted")]
    NothingExtracted,

    #[error("Unknown topic: {0}")]
    UnknownTopic(String),

    #[error("Unknown diagram container: {0}")]
    UnknownContainer(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    TabSource(#[from] TabSourceError),
}
