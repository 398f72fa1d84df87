//! Topic clusters proposed by the AI collaborator.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::tab::ExtractedTabData;

/// Structured reply to the clustering prompt: `{ "groups": [...] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupingResponse {
    pub groups: Vec<TopicGroup>,
}

/// One AI-proposed cluster: a title plus indices into the extracted tab list.
///
/// Index parsing is permissive: negative, fractional or non-numeric entries
/// are dropped instead of failing the whole reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicGroup {
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_indices")]
    pub ids: Vec<usize>,
}

impl TopicGroup {
    pub fn new(title: impl Into<String>, ids: Vec<usize>) -> Self {
        Self {
            title: title.into(),
            ids,
        }
    }
}

/// A topic group with its indices resolved against the session's tab data.
#[derive(Debug, Clone, PartialEq)]
pub struct Topic {
    pub title: String,
    pub tabs: Vec<ExtractedTabData>,
}

impl Topic {
    /// Out-of-range indices are dropped silently.
    pub fn resolve(group: &TopicGroup, data: &[ExtractedTabData]) -> Self {
        Self {
            title: group.title.clone(),
            tabs: group
                .ids
                .iter()
                .filter_map(|&idx| data.get(idx).cloned())
                .collect(),
        }
    }
}

fn lenient_indices<'de, D>(deserializer: D) -> Result<Vec<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let indices = match value {
        Value::Array(items) => items.iter().filter_map(index_from_value).collect(),
        other => index_from_value(&other).into_iter().collect(),
    };
    Ok(indices)
}

fn index_from_value(value: &Value) -> Option<usize> {
    match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                return usize::try_from(u).ok();
            }
            let f = n.as_f64()?;
            (f >= 0.0 && f.fract() == 0.0).then_some(f as usize)
        }
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
