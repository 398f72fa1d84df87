//! AI endpoint settings shared by the dashboard and chat providers.

use serde::{Deserialize, Serialize};

/// Endpoint URL, model identifier and credential for the AI chat API.
///
/// Persisted as JSON under a fixed key, so field names are part of the
/// storage format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub key: String,
}

impl ApiConfig {
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            model: model.into(),
            key: key.into(),
        }
    }

    /// A credential is required before any AI call is attempted.
    pub fn has_key(&self) -> bool {
        !self.key.trim().is_empty()
    }

    /// Fill empty fields from `other`, keeping values already set.
    pub fn or(mut self, other: &ApiConfig) -> Self {
        if self.endpoint.is_empty() {
            self.endpoint = other.endpoint.clone();
        }
        if self.model.is_empty() {
            self.model = other.model.clone();
        }
        if self.key.is_empty() {
            self.key = other.key.clone();
        }
        self
    }

    /// Credential with everything but the last four characters masked.
    pub fn masked_key(&self) -> String {
        let count = self.key.chars().count();
        if count <= 4 {
            return "*".repeat(count);
        }
        let tail: String = self.key.chars().skip(count - 4).collect();
        format!("{}{}", "*".repeat(count - 4), tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_key() {
        assert!(!ApiConfig::default().has_key());
        assert!(!ApiConfig::new("e", "m", "   ").has_key());
        assert!(ApiConfig::new("e", "m", "sk-1").has_key());
    }

    #[test]
    fn test_or_keeps_set_fields() {
        let stored = ApiConfig::new("https://stored", "stored-model", "stored-key");
        let merged = ApiConfig::new("", "cli-model", "").or(&stored);
        assert_eq!(merged.endpoint, "https://stored");
        assert_eq!(merged.model, "cli-model");
        assert_eq!(merged.key, "stored-key");
    }

    #[test]
    fn test_masked_key() {
        assert_eq!(ApiConfig::new("", "", "sk-abcdef").masked_key(), "*****cdef");
        assert_eq!(ApiConfig::new("", "", "abc").masked_key(), "***");
    }

    #[test]
    fn test_serde_field_names() {
        let config: ApiConfig =
            serde_json::from_str(r#"{"endpoint":"https://x","model":"m","key":"k"}"#).unwrap();
        assert_eq!(config, ApiConfig::new("https://x", "m", "k"));

        let partial: ApiConfig = serde_json::from_str(r#"{"model":"m"}"#).unwrap();
        assert!(partial.endpoint.is_empty());
    }
}
