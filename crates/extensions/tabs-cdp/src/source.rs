//! Tab source and content extractor over CDP.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};

use flowtab_protocols::{
    ContentExtractor, ExtractionError, ExtractionOutcome, TabId, TabInfo, TabSource,
    TabSourceError,
};

use crate::error::CdpError;
use crate::protocol::{parse_evaluation, PageInfo};
use crate::script::READABLE_TEXT_SCRIPT;
use crate::session::PageSession;

const DEFAULT_CONTENT_LIMIT: usize = 1000;
const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Browser tabs reached through Chrome's remote debugging endpoint.
pub struct CdpTabSource {
    http_endpoint: String,
    client: Client,
    content_limit: usize,
    call_timeout: Duration,
}

impl CdpTabSource {
    /// `endpoint` is the debugging address, e.g. `http://127.0.0.1:9222`.
    pub fn new(endpoint: &str) -> Self {
        Self {
            http_endpoint: endpoint.trim_end_matches('/').to_string(),
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to create HTTP client"),
            content_limit: DEFAULT_CONTENT_LIMIT,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    /// Maximum characters of article text kept per tab.
    pub fn with_content_limit(mut self, limit: usize) -> Self {
        self.content_limit = limit;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.http_endpoint
    }

    /// All page targets from `/json/list`.
    pub async fn list_pages(&self) -> Result<Vec<PageInfo>, CdpError> {
        let url = format!("{}/json/list", self.http_endpoint);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CdpError::ChromeNotAvailable(format!("{}: {}", self.http_endpoint, e)))?;
        if !response.status().is_success() {
            return Err(CdpError::Http(format!("{} returned {}", url, response.status())));
        }
        let pages: Vec<PageInfo> = response.json().await?;
        Ok(pages.into_iter().filter(PageInfo::is_tab).collect())
    }

    async fn page(&self, id: &str) -> Result<PageInfo, CdpError> {
        self.list_pages()
            .await?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| CdpError::PageNotFound(id.to_string()))
    }

    /// Hit `/json/{action}/{id}`; Chrome answers 404 for unknown targets.
    async fn target_command(&self, action: &str, id: &str) -> Result<(), CdpError> {
        let url = format!("{}/json/{}/{}", self.http_endpoint, action, id);
        let response = self.client.get(&url).send().await?;
        match response.status().as_u16() {
            200..=299 => Ok(()),
            404 => Err(CdpError::PageNotFound(id.to_string())),
            status => Err(CdpError::Http(format!("{} returned {}", url, status))),
        }
    }

    async fn extract_page(&self, tab: &TabInfo) -> Result<ExtractionOutcome, CdpError> {
        let page = self.page(tab.id.as_str()).await?;
        let ws_url = page
            .web_socket_debugger_url
            .ok_or_else(|| CdpError::ConnectionFailed(format!("Tab {} is already being debugged", tab.id)))?;

        let mut session = PageSession::connect(&ws_url, self.call_timeout).await?;
        let result = session.evaluate(READABLE_TEXT_SCRIPT).await;
        session.close().await;
        parse_evaluation(&result?, self.content_limit)
    }
}

#[async_trait]
impl TabSource for CdpTabSource {
    async fn list_tabs(&self) -> Result<Vec<TabInfo>, TabSourceError> {
        let pages = self.list_pages().await?;
        debug!(count = pages.len(), "Listed browser tabs");
        Ok(pages.iter().map(PageInfo::to_tab_info).collect())
    }

    async fn activate(&self, tab: &TabInfo) -> Result<(), TabSourceError> {
        self.target_command("activate", tab.id.as_str()).await?;
        info!(tab = %tab.id, "Activated tab");
        Ok(())
    }

    async fn close(&self, ids: &[TabId]) -> Result<(), TabSourceError> {
        let mut first_error = None;
        for id in ids {
            if let Err(e) = self.target_command("close", id.as_str()).await {
                warn!(tab = %id, error = %e, "Failed to close tab");
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e.into()),
            None => {
                info!(count = ids.len(), "Closed tabs");
                Ok(())
            }
        }
    }
}

#[async_trait]
impl ContentExtractor for CdpTabSource {
    async fn extract(&self, tab: &TabInfo) -> Result<ExtractionOutcome, ExtractionError> {
        let outcome = self.extract_page(tab).await?;
        if let ExtractionOutcome::Error { error } = &outcome {
            debug!(tab = %tab.id, error = %error, "Page reported extraction error");
        }
        Ok(outcome)
    }
}

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;
