//! FlowTab - AI topic clustering and synthesis for open browser tabs
//!
//! Main entry point for the FlowTab CLI.

use std::path::PathBuf;

use clap::Parser;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use flowtab_config::{Config, ConfigLoader};

mod cli;
mod cmd_config;
mod cmd_dashboard;
mod cmd_diagram;

use cli::{Cli, Commands};

/// Get the ~/.flowtab directory path.
pub(crate) fn flowtab_dir() -> PathBuf {
    ConfigLoader::home_dir()
}

/// JSON settings store shared by every command.
pub(crate) fn storage_path() -> PathBuf {
    flowtab_dir().join("storage.json")
}

/// Initialize tracing with console and file output.
///
/// Log files are written to ~/.flowtab/logs/ with daily rotation.
fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = flowtab_dir().join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("flowtab")
        .filename_suffix("log")
        .max_log_files(14)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Keep the writer alive for the program duration
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(true)
                .with_writer(std::io::stderr)
        )
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
        )
        .init();

    Ok(())
}

/// Load the config file and apply CLI overrides.
fn load_config(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let path = cli
        .config
        .clone()
        .unwrap_or_else(|| flowtab_dir().join("config.toml"));
    let mut config = ConfigLoader::load_or_default(&path)?;

    if let Some(cdp) = &cli.cdp {
        config.extraction.cdp_endpoint = cdp.clone();
    }
    if let Some(output) = &cli.output {
        config.output.path = output.clone();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing()?;

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Tabs => cmd_dashboard::list_tabs(&config).await,
        Commands::Scan => cmd_dashboard::scan(&config).await,
        Commands::Open { topic, retry_failed, close_tabs } => {
            cmd_dashboard::open(&config, &topic, retry_failed, close_tabs).await
        }
        Commands::Select { tab_ids } => cmd_dashboard::select(&config, &tab_ids).await,
        Commands::Focus { tab_id } => cmd_dashboard::focus(&config, &tab_id).await,
        Commands::Sanitize { file } => cmd_diagram::sanitize_file(&file),
        Commands::Render { file, svg } => cmd_diagram::render_file(&config, &file, svg.as_deref()).await,
        Commands::Config { action } => cmd_config::handle_config_command(action, &config),
    }
}
