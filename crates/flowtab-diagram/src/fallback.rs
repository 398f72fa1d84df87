//! Degraded view shown when a diagram cannot be rendered.

use flowtab_protocols::DiagramContainer;
use htmlize::{escape_attribute, escape_text};

/// Presents a diagram that exhausted its render attempts.
pub trait FallbackPresenter: Send + Sync {
    fn present(&self, container: &mut DiagramContainer, text: &str);
}

/// Default presenter: banner, escaped source and a retry button.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkupFallback;

impl FallbackPresenter for MarkupFallback {
    fn present(&self, container: &mut DiagramContainer, text: &str) {
        present_fallback(container, text);
    }
}

/// Replace the container content with the fallback markup and remember
/// `text` for a later manual re-render.
pub fn present_fallback(container: &mut DiagramContainer, text: &str) {
    container.untag();
    let markup = format!(
        concat!(
            "<div class=\"diagram-fallback\">",
            "<p class=\"diagram-fallback-banner\">⚠️ Diagram rendering failed</p>",
            "<pre class=\"diagram-fallback-source\">{source}</pre>",
            "<button class=\"diagram-retry\" data-retry-container=\"{id}\">🔄 Re-render</button>",
            "</div>"
        ),
        source = escape_text(text),
        id = escape_attribute(container.id()),
    );
    container.set_fallback(markup, text);
}
