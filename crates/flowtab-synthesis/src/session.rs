//! Dashboard session: tab scanning, clustering and topic synthesis.

use std::sync::Arc;
use std::time::Duration;

use flowtab_config::{load_api_config, save_api_config, KeyValueStore};
use flowtab_diagram::SafeRenderer;
use flowtab_protocols::{
    ApiConfig, ChatProvider, ContentExtractor, DiagramContainer, ExtractedTabData,
    ExtractionError, ExtractionOutcome, ProviderError, TabId, TabInfo, TabSource, Topic,
};
use tracing::{debug, error, info, warn};

use crate::composer::{compose, DiagramSlot, ItemEntry, Segment, SynthesisResult};
use crate::error::DashboardError;
use crate::parser::{extract_diagram_blocks, parse_grouping_response, resolve_topics};
use crate::prompts::{clustering_prompt, synthesis_prompt};

/// Id of the container holding the overall relationship diagram.
pub const RELATION_CONTAINER_ID: &str = "relation-chart";

/// Id of the container for a per-page diagram built from `block`.
pub fn item_container_id(block: usize) -> String {
    format!("page-flow-{}", block + 1)
}

/// What the dashboard currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardView {
    /// Nothing to show; carries a hint for the user.
    Empty(String),
    /// Extracted pages without clustering.
    Summary(Vec<ExtractedTabData>),
    Topics(Vec<Topic>),
    Detail(TopicDetail),
}

/// An opened topic with its synthesis and rendered diagram containers.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicDetail {
    pub topic: Topic,
    pub synthesis: Option<SynthesisResult>,
    pub containers: Vec<DiagramContainer>,
    /// Set when the synthesis request failed.
    pub failure: Option<String>,
}

impl TopicDetail {
    pub fn container(&self, id: &str) -> Option<&DiagramContainer> {
        self.containers.iter().find(|c| c.id() == id)
    }

    pub fn rendered_count(&self) -> usize {
        self.containers.iter().filter(|c| c.is_rendered()).count()
    }

    pub fn fallback_count(&self) -> usize {
        self.containers.iter().filter(|c| c.is_fallback()).count()
    }
}

/// Knobs for the dashboard that do not belong to a collaborator.
#[derive(Debug, Clone)]
pub struct DashboardSettings {
    /// Used for fields the settings store leaves empty.
    pub api_defaults: ApiConfig,
    pub summary_limit: usize,
    pub tab_timeout: Duration,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            api_defaults: ApiConfig::default(),
            summary_limit: 600,
            tab_timeout: Duration::from_secs(15),
        }
    }
}

/// Session state plus the collaborators it drives.
///
/// The extracted tab buffer is replaced wholesale on every scan.
pub struct Dashboard {
    tabs: Arc<dyn TabSource>,
    extractor: Arc<dyn ContentExtractor>,
    provider: Arc<dyn ChatProvider>,
    renderer: SafeRenderer,
    store: Box<dyn KeyValueStore>,
    settings: DashboardSettings,
    api: ApiConfig,
    extracted: Vec<ExtractedTabData>,
    topics: Vec<Topic>,
    view: DashboardView,
    status: String,
}

impl Dashboard {
    pub fn new(
        tabs: Arc<dyn TabSource>,
        extractor: Arc<dyn ContentExtractor>,
        provider: Arc<dyn ChatProvider>,
        renderer: SafeRenderer,
        store: Box<dyn KeyValueStore>,
    ) -> Self {
        Self {
            tabs,
            extractor,
            provider,
            renderer,
            store,
            settings: DashboardSettings::default(),
            api: ApiConfig::default(),
            extracted: Vec::new(),
            topics: Vec::new(),
            view: DashboardView::Empty(String::new()),
            status: String::new(),
        }
    }

    pub fn with_settings(mut self, settings: DashboardSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn view(&self) -> &DashboardView {
        &self.view
    }

    pub fn extracted(&self) -> &[ExtractedTabData] {
        &self.extracted
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn api_config(&self) -> &ApiConfig {
        &self.api
    }

    pub fn set_api_config(&mut self, api: ApiConfig) {
        self.api = api;
    }

    /// Load the persisted AI settings.
    pub fn start(&mut self) {
        self.api = load_api_config(self.store.as_ref()).or(&self.settings.api_defaults);
        debug!(endpoint = %self.api.endpoint, has_key = self.api.has_key(), "Dashboard started");
    }

    /// Enumerate web tabs, extract their text and cluster them when an API
    /// key is configured.
    pub async fn scan(&mut self) -> Result<(), DashboardError> {
        self.set_status("Scanning tabs...");
        let tabs = self.list_tabs_or_report().await?;

        let pages: Vec<TabInfo> = tabs.into_iter().filter(TabInfo::is_web_page).collect();
        if pages.is_empty() {
            self.set_status("No active web pages");
            self.extracted.clear();
            self.topics.clear();
            self.view = DashboardView::Empty(
                "Open some web pages in the browser and try again.".to_string(),
            );
            return Ok(());
        }

        self.set_status(format!("Extracting {} pages...", pages.len()));
        self.extracted = self.extract_all(&pages).await;
        self.topics.clear();
        self.persist_api_config();

        if self.api.has_key() {
            self.cluster().await
        } else {
            self.set_status("Please configure an API key");
            self.view = DashboardView::Summary(self.extracted.clone());
            Ok(())
        }
    }

    /// Ask the AI to group the extracted pages into topics.
    ///
    /// Provider failures degrade to the unclustered summary; only an
    /// unrecognized reply envelope is returned as an error.
    pub async fn cluster(&mut self) -> Result<(), DashboardError> {
        self.set_status("Clustering...");
        self.persist_api_config();
        let prompt = clustering_prompt(&self.extracted);

        match self.provider.chat(&prompt, &self.api).await {
            Ok(reply) => match parse_grouping_response(&reply) {
                Some(grouping) => {
                    self.topics = resolve_topics(&grouping, &self.extracted);
                    info!(
                        topics = self.topics.len(),
                        pages = self.extracted.len(),
                        "Clustering complete"
                    );
                    self.set_status(format!(
                        "{} topics from {} pages",
                        self.topics.len(),
                        self.extracted.len()
                    ));
                    self.view = DashboardView::Topics(self.topics.clone());
                    Ok(())
                }
                None => {
                    warn!("Clustering reply had no usable grouping");
                    self.set_status("Clustering unavailable, showing page summaries");
                    self.view = DashboardView::Summary(self.extracted.clone());
                    Ok(())
                }
            },
            Err(e) => {
                self.set_status(format!("Clustering failed: {e}"));
                self.view = DashboardView::Summary(self.extracted.clone());
                degrade(e)
            }
        }
    }

    /// Find a topic by 1-based position or case-insensitive title.
    pub fn find_topic(&self, query: &str) -> Option<&Topic> {
        if let Ok(position) = query.trim().parse::<usize>() {
            return position.checked_sub(1).and_then(|i| self.topics.get(i));
        }
        self.topics
            .iter()
            .find(|topic| topic.title.eq_ignore_ascii_case(query.trim()))
    }

    /// Synthesize `topic` and render its diagrams.
    pub async fn open_topic(&mut self, topic: Topic) -> Result<(), DashboardError> {
        self.set_status("Synthesizing...");
        self.persist_api_config();
        let prompt = synthesis_prompt(&topic.tabs);

        match self.provider.chat(&prompt, &self.api).await {
            Ok(reply) => {
                let blocks = extract_diagram_blocks(&reply);
                debug!(blocks = blocks.len(), "Diagram blocks found in synthesis");
                let synthesis = compose(&reply, &blocks);
                let containers = self.render_diagrams(&synthesis).await;
                let detail = TopicDetail {
                    topic,
                    synthesis: Some(synthesis),
                    containers,
                    failure: None,
                };
                self.set_status(format!(
                    "Synthesis ready: {} diagrams rendered, {} shown as source",
                    detail.rendered_count(),
                    detail.fallback_count()
                ));
                self.view = DashboardView::Detail(detail);
                Ok(())
            }
            Err(e) => {
                let message = format!("Synthesis failed: {e}");
                self.set_status(message.clone());
                self.view = DashboardView::Detail(TopicDetail {
                    topic,
                    synthesis: None,
                    containers: Vec::new(),
                    failure: Some(message),
                });
                degrade(e)
            }
        }
    }

    /// The opened topic, if the current view shows one.
    pub fn detail(&self) -> Option<&TopicDetail> {
        match &self.view {
            DashboardView::Detail(detail) => Some(detail),
            _ => None,
        }
    }

    /// Open a topic by title or position, see [`find_topic`](Self::find_topic).
    pub async fn open_topic_by_query(&mut self, query: &str) -> Result<(), DashboardError> {
        let topic = self
            .find_topic(query)
            .cloned()
            .ok_or_else(|| DashboardError::UnknownTopic(query.to_string()))?;
        self.open_topic(topic).await
    }

    /// Extract only the chosen tabs and synthesize them directly, skipping
    /// clustering.
    pub async fn synthesize_selected(&mut self, ids: &[TabId]) -> Result<(), DashboardError> {
        let tabs = self.list_tabs_or_report().await?;
        let selected: Vec<TabInfo> = ids
            .iter()
            .filter_map(|id| tabs.iter().find(|tab| &tab.id == id && tab.is_web_page()))
            .cloned()
            .collect();

        self.set_status(format!("Extracting {} selected pages...", selected.len()));
        self.extracted = self.extract_all(&selected).await;
        self.persist_api_config();

        if self.extracted.is_empty() {
            self.set_status("No content could be extracted");
            self.view = DashboardView::Empty(
                "None of the selected tabs could be read. Check the tab ids with `flowtab tabs`."
                    .to_string(),
            );
            return Err(DashboardError::NothingExtracted);
        }
        if !self.api.has_key() {
            self.set_status("Please configure an API key");
            self.view = DashboardView::Summary(self.extracted.clone());
            return Err(DashboardError::MissingApiKey);
        }

        let topic = Topic {
            title: format!("Custom synthesis ({} pages)", self.extracted.len()),
            tabs: self.extracted.clone(),
        };
        self.open_topic(topic).await
    }

    /// Bring a source page to the front.
    pub async fn activate_tab(&self, tab: &ExtractedTabData) -> Result<(), DashboardError> {
        let info = TabInfo {
            id: tab.tab_id.clone(),
            window_id: tab.window_id,
            url: tab.url.clone(),
            title: tab.title.clone(),
            favicon_url: tab.favicon_url.clone(),
        };
        self.tabs.activate(&info).await?;
        Ok(())
    }

    /// Close every tab of `topic`, then rescan.
    pub async fn close_topic_tabs(&mut self, topic: &Topic) -> Result<(), DashboardError> {
        let ids: Vec<TabId> = topic.tabs.iter().map(|tab| tab.tab_id.clone()).collect();
        info!(topic = %topic.title, tabs = ids.len(), "Closing topic tabs");
        self.tabs.close(&ids).await?;
        self.scan().await
    }

    /// Manually re-render a diagram that is showing its fallback view.
    pub async fn retry_diagram(&mut self, container_id: &str) -> Result<bool, DashboardError> {
        let DashboardView::Detail(detail) = &mut self.view else {
            return Err(DashboardError::UnknownContainer(container_id.to_string()));
        };
        let container = detail
            .containers
            .iter_mut()
            .find(|c| c.id() == container_id)
            .ok_or_else(|| DashboardError::UnknownContainer(container_id.to_string()))?;
        let recovered = self.renderer.retry(container).await;
        let (rendered, fallback) = (detail.rendered_count(), detail.fallback_count());
        self.set_status(format!(
            "Synthesis ready: {rendered} diagrams rendered, {fallback} shown as source"
        ));
        Ok(recovered)
    }

    /// List tabs, putting the dashboard into its unreachable state on failure.
    async fn list_tabs_or_report(&mut self) -> Result<Vec<TabInfo>, DashboardError> {
        match self.tabs.list_tabs().await {
            Ok(tabs) => Ok(tabs),
            Err(e) => {
                error!("Tab listing failed: {}", e);
                self.set_status(format!("Scan failed: {e}"));
                self.view = DashboardView::Empty("The browser could not be reached.".to_string());
                Err(e.into())
            }
        }
    }

    async fn extract_one(&self, tab: &TabInfo) -> Result<ExtractionOutcome, ExtractionError> {
        tokio::time::timeout(self.settings.tab_timeout, self.extractor.extract(tab))
            .await
            .unwrap_or(Err(ExtractionError::Timeout(self.settings.tab_timeout.as_secs())))
    }

    async fn extract_all(&self, tabs: &[TabInfo]) -> Vec<ExtractedTabData> {
        let mut extracted = Vec::with_capacity(tabs.len());
        for tab in tabs {
            match self.extract_one(tab).await {
                Ok(ExtractionOutcome::Content(content)) => {
                    extracted.push(ExtractedTabData::from_extraction(
                        tab,
                        content,
                        self.settings.summary_limit,
                    ));
                }
                Ok(ExtractionOutcome::Error { error }) => {
                    warn!(tab = %tab.id, "Tab skipped: {}", error);
                }
                Err(e) => {
                    warn!(tab = %tab.id, "Tab skipped: {}", e);
                }
            }
        }
        info!(extracted = extracted.len(), total = tabs.len(), "Extraction finished");
        extracted
    }

    async fn render_diagrams(&self, synthesis: &SynthesisResult) -> Vec<DiagramContainer> {
        let mut containers = Vec::new();
        for segment in &synthesis.segments {
            match segment {
                Segment::Item(card) => {
                    for entry in &card.entries {
                        if let ItemEntry::Diagram(slot) = entry {
                            let id = item_container_id(slot.block);
                            containers.push(self.render_slot(id, slot).await);
                        }
                    }
                }
                Segment::Overall(slot) => {
                    let id = RELATION_CONTAINER_ID.to_string();
                    containers.push(self.render_slot(id, slot).await);
                }
                _ => {}
            }
        }
        containers
    }

    async fn render_slot(&self, id: String, slot: &DiagramSlot) -> DiagramContainer {
        let mut container = DiagramContainer::new(id);
        self.renderer.render(&mut container, &slot.source.text).await;
        container
    }

    fn persist_api_config(&self) {
        if let Err(e) = save_api_config(self.store.as_ref(), &self.api) {
            warn!("Failed to save API settings: {}", e);
        }
    }

    fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
        debug!(status = %self.status, "Dashboard status");
    }
}

/// Recoverable provider failures are logged and swallowed; the hard one is
/// returned to the caller.
fn degrade(e: ProviderError) -> Result<(), DashboardError> {
    if e.is_hard() {
        error!("AI reply not understood: {}", e);
        Err(e.into())
    } else {
        warn!("AI request failed: {}", e);
        Ok(())
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
