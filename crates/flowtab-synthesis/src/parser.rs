//! Extraction of structured data and diagram blocks from free-form AI text.

use std::sync::LazyLock;

use flowtab_protocols::{ExtractedTabData, GroupingResponse, Topic};
use regex::Regex;
use tracing::debug;

/// A ```` ```mermaid ```` fenced block; group 1 is the untrimmed interior.
pub(crate) static MERMAID_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```mermaid\s*(.*?)```").expect("valid fence pattern"));

static ANY_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[A-Za-z0-9_+-]*[ \t]*\n?(.*?)```").expect("valid fence pattern")
});

/// Recover a grouping reply from AI text.
///
/// Tries, in order, the whole text, the first fenced block, and the span
/// from the first `{` to the last `}`. Returns `None` when no candidate
/// deserializes into `{ "groups": [...] }`.
pub fn parse_grouping_response(raw: &str) -> Option<GroupingResponse> {
    let parsed = parse_whole(raw)
        .or_else(|| parse_first_fence(raw))
        .or_else(|| parse_brace_span(raw));
    if parsed.is_none() {
        debug!(len = raw.len(), "No grouping structure found in AI reply");
    }
    parsed
}

fn parse_candidate(candidate: &str) -> Option<GroupingResponse> {
    serde_json::from_str(candidate.trim()).ok()
}

fn parse_whole(raw: &str) -> Option<GroupingResponse> {
    parse_candidate(raw)
}

fn parse_first_fence(raw: &str) -> Option<GroupingResponse> {
    let caps = ANY_FENCE.captures(raw)?;
    parse_candidate(&caps[1])
}

// Heuristic: prose containing braces can defeat it, so it runs last.
fn parse_brace_span(raw: &str) -> Option<GroupingResponse> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    parse_candidate(&raw[start..=end])
}

/// Interiors of all mermaid fenced blocks, trimmed, in order.
pub fn extract_diagram_blocks(raw: &str) -> Vec<String> {
    MERMAID_FENCE
        .captures_iter(raw)
        .map(|caps| caps[1].trim().to_string())
        .collect()
}

/// Map every group onto the session's tab data. Invalid indices are
/// dropped without complaint.
pub fn resolve_topics(response: &GroupingResponse, tabs: &[ExtractedTabData]) -> Vec<Topic> {
    response
        .groups
        .iter()
        .map(|group| Topic::resolve(group, tabs))
        .collect()
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
