//! CLI definitions for FlowTab.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// FlowTab CLI.
#[derive(Parser)]
#[command(name = "flowtab")]
#[command(about = "Cluster open browser tabs into topics and synthesize them with AI")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: ~/.flowtab/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Chrome remote debugging endpoint
    #[arg(long, global = true, env = "FLOWTAB_CDP_ENDPOINT")]
    pub cdp: Option<String>,

    /// Dashboard HTML output path
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// List open browser tabs
    Tabs,

    /// Extract every web tab and cluster the pages into topics
    Scan,

    /// Scan, then synthesize one topic by number or title
    ///
    /// Tabs are clustered again on every run, so topic numbers from an
    /// earlier `flowtab scan` may point at a different group. Prefer the
    /// topic title.
    Open {
        /// Topic title, or its 1-based number in this run's clustering
        topic: String,

        /// Re-render diagrams that fell back to source view
        #[arg(long)]
        retry_failed: bool,

        /// Close the topic's tabs after synthesis
        #[arg(long)]
        close_tabs: bool,
    },

    /// Synthesize a custom selection of tabs, skipping clustering
    Select {
        /// Tab ids as listed by `flowtab tabs`
        #[arg(required = true)]
        tab_ids: Vec<String>,
    },

    /// Focus a tab in the browser
    Focus {
        /// Tab id as listed by `flowtab tabs`
        tab_id: String,
    },

    /// Print the sanitized form of a Mermaid file
    Sanitize {
        /// Mermaid source file
        file: PathBuf,
    },

    /// Sanitize and render a Mermaid file to SVG
    Render {
        /// Mermaid source file
        file: PathBuf,

        /// SVG output path (default: stdout)
        #[arg(long)]
        svg: Option<PathBuf>,
    },

    /// AI settings management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show the effective settings
    Show,

    /// Persist AI endpoint settings
    Set {
        /// Chat API endpoint URL
        #[arg(long)]
        endpoint: Option<String>,

        /// Model identifier
        #[arg(long)]
        model: Option<String>,

        /// API key
        #[arg(long, env = "FLOWTAB_API_KEY", hide_env_values = true)]
        key: Option<String>,
    },
}
