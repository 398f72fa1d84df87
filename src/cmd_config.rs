//! Config subcommand handlers for FlowTab.

use tracing::info;

use flowtab_config::{load_api_config, save_api_config, Config, FileStore};

use crate::cli::ConfigAction;
use crate::storage_path;

/// Handle config subcommands.
pub(crate) fn handle_config_command(action: ConfigAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let store = FileStore::new(storage_path());
    match action {
        ConfigAction::Show => {
            let api = load_api_config(&store).or(&config.api);
            println!("[api]");
            println!("endpoint = {:?}", api.endpoint);
            println!("model    = {:?}", api.model);
            println!("key      = {:?}", api.masked_key());
            println!();
            println!("[extraction]");
            println!("cdp_endpoint     = {:?}", config.extraction.cdp_endpoint);
            println!("content_limit    = {}", config.extraction.content_limit);
            println!("summary_limit    = {}", config.extraction.summary_limit);
            println!("tab_timeout_secs = {}", config.extraction.tab_timeout_secs);
            println!();
            println!("[render]");
            println!("engine_url      = {:?}", config.render.engine_url);
            println!("max_retries     = {}", config.render.max_retries);
            println!("manual_retries  = {}", config.render.manual_retries);
            println!("settle_delay_ms = {}", config.render.settle_delay_ms);
            println!("retry_delay_ms  = {}", config.render.retry_delay_ms);
            println!();
            println!("[output]");
            println!("path = {:?}", config.output.path.display().to_string());
            println!();
            println!("settings store: {}", store.path().display());
            Ok(())
        }
        ConfigAction::Set { endpoint, model, key } => {
            let mut api = load_api_config(&store);
            if let Some(endpoint) = endpoint {
                api.endpoint = endpoint;
            }
            if let Some(model) = model {
                api.model = model;
            }
            if let Some(key) = key {
                api.key = key;
            }
            save_api_config(&store, &api)?;
            info!(endpoint = %api.endpoint, model = %api.model, "Saved AI settings");
            println!("Saved to {}", store.path().display());
            Ok(())
        }
    }
}
