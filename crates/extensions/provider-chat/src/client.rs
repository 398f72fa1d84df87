//! Chat client implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use flowtab_protocols::{ApiConfig, ChatProvider, ProviderError};

use crate::api::{ApiReply, Envelope};

const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Chat client for OpenAI-compatible and Gemini endpoints.
pub struct ChatClient {
    client: Client,
    timeout_secs: u64,
    /// Fixed envelope; detected from the endpoint when unset.
    envelope: Option<Envelope>,
}

impl ChatClient {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    /// Client whose requests give up after `secs` seconds.
    pub fn with_timeout(secs: u64) -> Self {
        Self {
            client: Client::builder()
                .connect_timeout(Duration::from_secs(10))
                .timeout(Duration::from_secs(secs))
                .build()
                .expect("Failed to build HTTP client"),
            timeout_secs: secs,
            envelope: None,
        }
    }

    fn request_error(&self, e: reqwest::Error) -> ProviderError {
        if e.is_timeout() {
            ProviderError::Timeout(self.timeout_secs)
        } else {
            ProviderError::Network(e.to_string())
        }
    }

    /// Force one envelope regardless of the endpoint host.
    pub fn with_envelope(mut self, envelope: Envelope) -> Self {
        self.envelope = Some(envelope);
        self
    }

    fn envelope_for(&self, endpoint: &str) -> Envelope {
        self.envelope.unwrap_or_else(|| Envelope::detect(endpoint))
    }
}

impl Default for ChatClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatProvider for ChatClient {
    async fn chat(&self, prompt: &str, config: &ApiConfig) -> Result<String, ProviderError> {
        let envelope = self.envelope_for(&config.endpoint);
        let url = envelope.url(&config.endpoint, &config.model, &config.key);
        debug!(envelope = ?envelope, model = %config.model, prompt_len = prompt.len(), "Sending chat request");

        let mut request = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&envelope.body(&config.model, prompt));
        if envelope == Envelope::ChatCompletion {
            request = request.header("Authorization", format!("Bearer {}", config.key));
        }

        let response = request.send().await.map_err(|e| self.request_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.request_error(e))?;

        if !status.is_success() {
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let reply: ApiReply = serde_json::from_str(&body)
            .map_err(|_| ProviderError::UnrecognizedResponse(body.clone()))?;
        let text = reply
            .into_text()
            .ok_or(ProviderError::UnrecognizedResponse(body))?;

        info!(envelope = ?envelope, reply_len = text.len(), "Chat reply received");
        Ok(text)
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
