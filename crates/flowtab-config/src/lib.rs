//! # FlowTab Config
//!
//! Configuration file loading and the persisted settings store.

mod error;
mod loader;
mod schema;
mod store;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use store::{
    load_api_config, save_api_config, FileStore, KeyValueStore, MemoryStore, API_CONFIG_KEY,
};
