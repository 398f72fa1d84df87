//! Persisted key-value settings store.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::{debug, warn};

use flowtab_protocols::ApiConfig;

use crate::error::ConfigError;

/// Fixed key the AI endpoint settings are stored under.
pub const API_CONFIG_KEY: &str = "flowtab_config";

/// String-to-string local storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, ConfigError>;
    fn set(&self, key: &str, value: &str) -> Result<(), ConfigError>;
}

/// Store backed by a single JSON object file.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, ConfigError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, ConfigError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(&entries)?)?;
        debug!("Stored {} in {}", key, self.path.display());
        Ok(())
    }
}

/// In-process store, used when nothing should touch the disk.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, ConfigError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Read the stored AI settings. Missing or unreadable entries yield defaults.
pub fn load_api_config(store: &dyn KeyValueStore) -> ApiConfig {
    match store.get(API_CONFIG_KEY) {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("Ignoring malformed stored config: {}", e);
            ApiConfig::default()
        }),
        Ok(None) => ApiConfig::default(),
        Err(e) => {
            warn!("Failed to read stored config: {}", e);
            ApiConfig::default()
        }
    }
}

/// Persist the AI settings under [`API_CONFIG_KEY`].
pub fn save_api_config(store: &dyn KeyValueStore, config: &ApiConfig) -> Result<(), ConfigError> {
    let raw = serde_json::to_string(config)?;
    store.set(API_CONFIG_KEY, &raw)
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
