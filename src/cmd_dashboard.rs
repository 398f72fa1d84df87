//! Dashboard subcommand handlers for FlowTab.

use std::sync::Arc;

use chrono::Local;
use tracing::{error, info, warn};

use flowtab_config::{Config, FileStore};
use flowtab_protocols::{TabId, TabSource};
use flowtab_provider_chat::ChatClient;
use flowtab_synthesis::{render_dashboard, Dashboard, DashboardSettings, DashboardView};
use flowtab_tabs_cdp::CdpTabSource;

use crate::cmd_diagram::build_renderer;
use crate::storage_path;

fn tab_source(config: &Config) -> Arc<CdpTabSource> {
    Arc::new(
        CdpTabSource::new(&config.extraction.cdp_endpoint)
            .with_content_limit(config.extraction.content_limit),
    )
}

/// Wire the dashboard to Chrome, the chat API, the render engine and the
/// settings store, then load persisted settings.
fn build_dashboard(config: &Config) -> Dashboard {
    let tabs = tab_source(config);
    let mut dashboard = Dashboard::new(
        tabs.clone(),
        tabs,
        Arc::new(ChatClient::new()),
        build_renderer(config),
        Box::new(FileStore::new(storage_path())),
    )
    .with_settings(DashboardSettings {
        api_defaults: config.api.clone(),
        summary_limit: config.extraction.summary_limit,
        tab_timeout: config.extraction.tab_timeout(),
    });
    dashboard.start();
    dashboard
}

/// Write the current view as HTML and echo the status line.
fn write_view(config: &Config, dashboard: &Dashboard) -> Result<(), Box<dyn std::error::Error>> {
    let html = render_dashboard(dashboard.view(), dashboard.status(), Local::now());
    if let Some(parent) = config.output.path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&config.output.path, html)?;
    println!("{}", dashboard.status());
    info!("Dashboard written to {}", config.output.path.display());
    Ok(())
}

/// List open tabs without extracting them.
pub(crate) async fn list_tabs(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let tabs = tab_source(config).list_tabs().await?;
    if tabs.is_empty() {
        println!("No open tabs.");
        return Ok(());
    }
    println!("{:<34} {:<40} URL", "ID", "TITLE");
    println!("{}", "-".repeat(100));
    for tab in &tabs {
        let title: String = tab.title.chars().take(38).collect();
        println!("{:<34} {:<40} {}", tab.id.as_str(), title, tab.url);
    }
    Ok(())
}

pub(crate) async fn scan(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut dashboard = build_dashboard(config);
    let result = dashboard.scan().await;
    if let Err(e) = &result {
        error!("Scan failed: {}", e);
    }
    print_topics(&dashboard);
    write_view(config, &dashboard)?;
    Ok(result?)
}

pub(crate) async fn open(
    config: &Config,
    query: &str,
    retry_failed: bool,
    close_tabs: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut dashboard = build_dashboard(config);
    if let Err(e) = dashboard.scan().await {
        write_view(config, &dashboard)?;
        return Err(e.into());
    }
    if let Err(e) = dashboard.open_topic_by_query(query).await {
        error!("Cannot open topic: {}", e);
        print_topics(&dashboard);
        write_view(config, &dashboard)?;
        return Err(e.into());
    }

    if retry_failed {
        let failed: Vec<String> = dashboard
            .detail()
            .map(|d| {
                d.containers
                    .iter()
                    .filter(|c| c.is_fallback())
                    .map(|c| c.id().to_string())
                    .collect()
            })
            .unwrap_or_default();
        for id in failed {
            match dashboard.retry_diagram(&id).await {
                Ok(true) => info!(container = %id, "Diagram recovered on manual retry"),
                Ok(false) => warn!(container = %id, "Diagram still failing after manual retry"),
                Err(e) => warn!(container = %id, error = %e, "Manual retry skipped"),
            }
        }
    }

    write_view(config, &dashboard)?;

    if close_tabs {
        let topic = dashboard.detail().map(|d| d.topic.clone());
        if let Some(topic) = topic {
            dashboard.close_topic_tabs(&topic).await?;
            println!("Closed {} tabs", topic.tabs.len());
            write_view(config, &dashboard)?;
        }
    }
    Ok(())
}

pub(crate) async fn select(config: &Config, tab_ids: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let mut dashboard = build_dashboard(config);
    let ids: Vec<TabId> = tab_ids.iter().map(|id| TabId::new(id.as_str())).collect();
    let result = dashboard.synthesize_selected(&ids).await;
    if let Err(e) = &result {
        error!("Synthesis failed: {}", e);
    }
    write_view(config, &dashboard)?;
    Ok(result?)
}

/// Bring one tab to the foreground.
pub(crate) async fn focus(config: &Config, tab_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let source = tab_source(config);
    let tabs = source.list_tabs().await?;
    let tab = tabs
        .iter()
        .find(|t| t.id.as_str() == tab_id)
        .ok_or_else(|| format!("Tab not found: {tab_id}"))?;
    source.activate(tab).await?;
    println!("Focused: {}", tab.title);
    Ok(())
}

fn print_topics(dashboard: &Dashboard) {
    match dashboard.view() {
        DashboardView::Topics(topics) => {
            for (i, topic) in topics.iter().enumerate() {
                println!("{:>3}. {} ({} pages)", i + 1, topic.title, topic.tabs.len());
                for tab in &topic.tabs {
                    println!("       - {} [{}]", tab.title, tab.tab_id);
                }
            }
        }
        DashboardView::Summary(pages) => {
            for page in pages {
                println!("  - {} [{}]", page.title, page.tab_id);
            }
        }
        _ => {}
    }
}
