//! AI chat provider protocol.

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::types::ApiConfig;

/// Sends a single free-text prompt to an AI chat endpoint and returns the
/// reply text.
///
/// The configuration travels with each call because it is re-read from the
/// settings store right before every request.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn chat(&self, prompt: &str, config: &ApiConfig) -> Result<String, ProviderError>;
}
