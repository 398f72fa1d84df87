//! Display slot that diagram rendering mutates.

use serde::Serialize;

/// What a [`DiagramContainer`] currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "body", rename_all = "snake_case")]
pub enum ContainerContent {
    Empty,
    /// Plain diagram source, waiting for the render engine.
    Source(String),
    /// Engine output (SVG markup).
    Rendered(String),
    /// Degraded markup shown after every attempt failed.
    Fallback(String),
    /// Short status text, e.g. while a manual re-render is running.
    Notice(String),
}

/// A single diagram slot in the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagramContainer {
    id: String,
    content: ContainerContent,
    tagged: bool,
    retry_source: Option<String>,
}

impl DiagramContainer {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: ContainerContent::Empty,
            tagged: false,
            retry_source: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn content(&self) -> &ContainerContent {
        &self.content
    }

    /// Whether the container is marked for the render engine.
    pub fn is_tagged(&self) -> bool {
        self.tagged
    }

    /// Diagram source currently written into the container, if any.
    pub fn source(&self) -> Option<&str> {
        match &self.content {
            ContainerContent::Source(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_rendered(&self) -> bool {
        matches!(self.content, ContainerContent::Rendered(_))
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.content, ContainerContent::Fallback(_))
    }

    /// Sanitized text captured when the fallback view was shown.
    pub fn retry_source(&self) -> Option<&str> {
        self.retry_source.as_deref()
    }

    /// Write diagram source as plain text content.
    pub fn write_source(&mut self, text: impl Into<String>) {
        self.content = ContainerContent::Source(text.into());
    }

    pub fn set_rendered(&mut self, svg: impl Into<String>) {
        self.content = ContainerContent::Rendered(svg.into());
    }

    pub fn set_fallback(&mut self, markup: impl Into<String>, retry_source: impl Into<String>) {
        self.content = ContainerContent::Fallback(markup.into());
        self.retry_source = Some(retry_source.into());
    }

    pub fn set_notice(&mut self, text: impl Into<String>) {
        self.content = ContainerContent::Notice(text.into());
    }

    pub fn clear(&mut self) {
        self.content = ContainerContent::Empty;
    }

    pub fn tag(&mut self) {
        self.tagged = true;
    }

    pub fn untag(&mut self) {
        self.tagged = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_container_is_empty() {
        let container = DiagramContainer::new("page-flow-1");
        assert_eq!(container.id(), "page-flow-1");
        assert_eq!(container.content(), &ContainerContent::Empty);
        assert!(!container.is_tagged());
        assert!(container.source().is_none());
    }

    #[test]
    fn test_source_and_render() {
        let mut container = DiagramContainer::new("c");
        container.write_source("graph TD\n    A --> B");
        container.tag();
        assert_eq!(container.source(), Some("graph TD\n    A --> B"));
        assert!(container.is_tagged());

        container.set_rendered("<svg/>");
        assert!(container.is_rendered());
        assert!(container.source().is_none());
    }

    #[test]
    fn test_fallback_captures_retry_source() {
        let mut container = DiagramContainer::new("c");
        container.set_fallback("<pre>x</pre>", "graph TD\n    x");
        assert!(container.is_fallback());
        assert_eq!(container.retry_source(), Some("graph TD\n    x"));
    }
}
