//! CDP protocol types.

use flowtab_protocols::{truncate_chars, ExtractedContent, ExtractionOutcome, TabId, TabInfo};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CdpError;

#[derive(Debug, Serialize)]
pub struct CdpRequest {
    pub id: u64,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct CdpResponse {
    pub id: Option<u64>,
    pub result: Option<Value>,
    pub error: Option<CdpErrorResponse>,
    pub method: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CdpErrorResponse {
    pub code: i64,
    pub message: String,
}

/// Target entry from the `/json/list` endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub id: String,
    #[serde(rename = "type")]
    pub page_type: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    pub favicon_url: Option<String>,
    pub web_socket_debugger_url: Option<String>,
}

impl PageInfo {
    /// Browser tabs only; workers, iframes and extensions are skipped.
    pub fn is_tab(&self) -> bool {
        self.page_type == "page"
    }

    pub fn to_tab_info(&self) -> TabInfo {
        TabInfo {
            id: TabId::new(self.id.clone()),
            window_id: None,
            url: self.url.clone(),
            title: self.title.clone(),
            favicon_url: self.favicon_url.clone(),
        }
    }
}

/// Turn a `Runtime.evaluate` result into an extraction outcome.
///
/// Script exceptions and `{error}` replies are page-side failures; anything
/// else must carry `title`, `content` and `url`.
pub(crate) fn parse_evaluation(result: &Value, content_limit: usize) -> Result<ExtractionOutcome, CdpError> {
    if let Some(exception) = result.get("exceptionDetails") {
        let text = exception["exception"]["description"]
            .as_str()
            .or_else(|| exception["text"].as_str())
            .unwrap_or("Unknown error");
        return Ok(ExtractionOutcome::Error {
            error: text.to_string(),
        });
    }

    let value = result["result"]["value"].clone();
    match serde_json::from_value::<ExtractionOutcome>(value)? {
        ExtractionOutcome::Content(content) => Ok(ExtractionOutcome::Content(ExtractedContent {
            content: truncate_chars(&content.content, content_limit),
            ..content
        })),
        error => Ok(error),
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
