use super::*;
use tempfile::TempDir;

#[test]
fn test_memory_store_roundtrip() {
    let store = MemoryStore::new();
    assert!(store.get("k").unwrap().is_none());
    store.set("k", "v").unwrap();
    assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
}

#[test]
fn test_file_store_creates_parent_dirs() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("storage.json");
    let store = FileStore::new(&path);

    store.set("a", "1").unwrap();
    store.set("b", "2").unwrap();

    assert!(path.exists());
    let reopened = FileStore::new(&path);
    assert_eq!(reopened.get("a").unwrap().as_deref(), Some("1"));
    assert_eq!(reopened.get("b").unwrap().as_deref(), Some("2"));
}

#[test]
fn test_file_store_missing_file_is_empty() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path().join("absent.json"));
    assert!(store.get("anything").unwrap().is_none());
}

#[test]
fn test_file_store_corrupt_file_errors() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("storage.json");
    std::fs::write(&path, "not json").unwrap();
    let store = FileStore::new(&path);
    assert!(matches!(store.get("k"), Err(ConfigError::Store(_))));
}

#[test]
fn test_api_config_save_and_load() {
    let store = MemoryStore::new();
    let config = ApiConfig::new("https://api.example.com/v1", "gpt-4o-mini", "sk-test");

    save_api_config(&store, &config).unwrap();
    let raw = store.get(API_CONFIG_KEY).unwrap().unwrap();
    assert!(raw.contains("\"endpoint\""));

    assert_eq!(load_api_config(&store), config);
}

#[test]
fn test_load_api_config_defaults() {
    let store = MemoryStore::new();
    assert_eq!(load_api_config(&store), ApiConfig::default());

    store.set(API_CONFIG_KEY, "{broken").unwrap();
    assert_eq!(load_api_config(&store), ApiConfig::default());
}
