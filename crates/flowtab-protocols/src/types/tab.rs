//! Tab metadata and per-tab extraction payloads.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque browser tab identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub String);

impl TabId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TabId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// An open tab as reported by the tab source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabInfo {
    pub id: TabId,
    #[serde(default)]
    pub window_id: Option<i64>,
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub favicon_url: Option<String>,
}

impl TabInfo {
    /// Only ordinary web pages take part in extraction.
    pub fn is_web_page(&self) -> bool {
        self.url.starts_with("http")
    }
}

/// Successful reply from a content extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedContent {
    pub title: String,
    pub content: String,
    pub url: String,
}

/// What the page-side extractor answered: article text or an error message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtractionOutcome {
    Error { error: String },
    Content(ExtractedContent),
}

/// Per-tab payload kept in the dashboard session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedTabData {
    pub tab_id: TabId,
    pub window_id: Option<i64>,
    pub favicon_url: Option<String>,
    pub title: String,
    pub url: String,
    /// Full extracted text, already bounded by the extractor.
    pub content: String,
    /// Shorter excerpt used in the clustering prompt.
    pub short_content: String,
}

impl ExtractedTabData {
    /// Combine tab metadata with extracted text. A blank extracted title
    /// falls back to the tab title.
    pub fn from_extraction(tab: &TabInfo, extracted: ExtractedContent, summary_limit: usize) -> Self {
        let title = if extracted.title.trim().is_empty() {
            tab.title.clone()
        } else {
            extracted.title
        };
        let short_content = truncate_chars(&extracted.content, summary_limit);
        Self {
            tab_id: tab.id.clone(),
            window_id: tab.window_id,
            favicon_url: tab.favicon_url.clone(),
            title,
            url: extracted.url,
            content: extracted.content,
            short_content,
        }
    }
}

/// Keep at most `limit` characters (not bytes) of `text`.
pub fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
#[path = "tab_tests.rs"]
mod tests;
