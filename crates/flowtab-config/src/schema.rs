//! Configuration schema definitions.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use flowtab_protocols::ApiConfig;

use crate::error::ConfigError;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// AI endpoint defaults, used for fields the settings store leaves empty.
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub extraction: ExtractionConfig,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Reject values the dashboard cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.render.max_retries == 0 {
            return Err(ConfigError::InvalidValue {
                field: "render.max_retries".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.render.manual_retries == 0 {
            return Err(ConfigError::InvalidValue {
                field: "render.manual_retries".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.extraction.summary_limit > self.extraction.content_limit {
            return Err(ConfigError::InvalidValue {
                field: "extraction.summary_limit".to_string(),
                message: "must not exceed extraction.content_limit".to_string(),
            });
        }
        Ok(())
    }
}

/// Tab enumeration and content extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Chrome remote-debugging HTTP endpoint.
    #[serde(default = "default_cdp_endpoint")]
    pub cdp_endpoint: String,

    /// Characters of article text kept per tab.
    #[serde(default = "default_content_limit")]
    pub content_limit: usize,

    /// Characters of article text sent in the clustering prompt.
    #[serde(default = "default_summary_limit")]
    pub summary_limit: usize,

    #[serde(default = "default_tab_timeout")]
    pub tab_timeout_secs: u64,
}

impl ExtractionConfig {
    pub fn tab_timeout(&self) -> Duration {
        Duration::from_secs(self.tab_timeout_secs)
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            cdp_endpoint: default_cdp_endpoint(),
            content_limit: default_content_limit(),
            summary_limit: default_summary_limit(),
            tab_timeout_secs: default_tab_timeout(),
        }
    }
}

fn default_cdp_endpoint() -> String {
    "http://127.0.0.1:9222".to_string()
}

fn default_content_limit() -> usize {
    1000
}

fn default_summary_limit() -> usize {
    600
}

fn default_tab_timeout() -> u64 {
    15
}

/// Diagram rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Base URL of the mermaid.ink compatible render service.
    #[serde(default = "default_engine_url")]
    pub engine_url: String,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_manual_retries")]
    pub manual_retries: u32,

    #[serde(default = "default_settle_delay")]
    pub settle_delay_ms: u64,

    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,
}

impl RenderConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            engine_url: default_engine_url(),
            max_retries: default_max_retries(),
            manual_retries: default_manual_retries(),
            settle_delay_ms: default_settle_delay(),
            retry_delay_ms: default_retry_delay(),
        }
    }
}

fn default_engine_url() -> String {
    "https://mermaid.ink".to_string()
}

fn default_max_retries() -> u32 {
    3
}

fn default_manual_retries() -> u32 {
    2
}

fn default_settle_delay() -> u64 {
    50
}

fn default_retry_delay() -> u64 {
    100
}

/// Dashboard output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// HTML dashboard file written by the CLI.
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

fn default_output_path() -> PathBuf {
    PathBuf::from("flowtab-dashboard.html")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.extraction.content_limit, 1000);
        assert_eq!(config.extraction.summary_limit, 600);
        assert_eq!(config.render.max_retries, 3);
        assert_eq!(config.render.manual_retries, 2);
        assert_eq!(config.render.settle_delay(), Duration::from_millis(50));
        assert_eq!(config.render.retry_delay(), Duration::from_millis(100));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_retries() {
        let mut config = Config::default();
        config.render.max_retries = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_summary_limit() {
        let mut config = Config::default();
        config.extraction.summary_limit = 2000;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("summary_limit"));
    }
}
