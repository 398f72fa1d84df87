//! Render engine backed by a mermaid.ink compatible HTTP service.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use flowtab_protocols::{DiagramContainer, RenderEngine, RenderError};
use reqwest::Client;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://mermaid.ink";

/// Fetches `{base}/svg/{base64(source)}` and stores the SVG in the container.
pub struct MermaidInkEngine {
    client: Client,
    base_url: String,
}

impl MermaidInkEngine {
    pub fn new() -> Self {
        Self::with_url(DEFAULT_BASE_URL)
    }

    pub fn with_url(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("FlowTab/0.1")
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn svg_url(&self, source: &str) -> String {
        format!("{}/svg/{}", self.base_url, URL_SAFE.encode(source.as_bytes()))
    }
}

impl Default for MermaidInkEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RenderEngine for MermaidInkEngine {
    async fn run(&self, container: &mut DiagramContainer) -> Result<(), RenderError> {
        let source = container.source().ok_or(RenderError::EmptyContainer)?;
        let url = self.svg_url(source);
        debug!(container = container.id(), "Requesting diagram render");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RenderError::Unavailable(e.to_string()))?;

        let status = response.status();
        let is_html = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("text/html"));
        let body = response
            .text()
            .await
            .map_err(|e| RenderError::Unavailable(e.to_string()))?;

        if !status.is_success() {
            return Err(RenderError::Syntax(format!("HTTP {}: {}", status.as_u16(), body.trim())));
        }
        if is_html || !body.contains("<svg") {
            return Err(RenderError::Syntax("Render service did not return SVG".to_string()));
        }

        container.set_rendered(body);
        Ok(())
    }
}
