//! Static HTML rendering of the dashboard state.

use chrono::{DateTime, Local};
use flowtab_protocols::{ContainerContent, DiagramContainer, ExtractedTabData, Topic};
use htmlize::{escape_attribute, escape_text};
use pulldown_cmark::{html, Event, Options, Parser};

use crate::composer::{ItemEntry, Segment, SynthesisResult};
use crate::session::{item_container_id, DashboardView, TopicDetail, RELATION_CONTAINER_ID};

/// Inline globe icon shown when a page has no usable favicon.
const DEFAULT_ICON: &str = "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 24 24' fill='%2394a3b8'%3E%3Ccircle cx='12' cy='12' r='10'/%3E%3C/svg%3E";

const STYLE: &str = r#"
body { background: #0f172a; color: #e2e8f0; font-family: system-ui, sans-serif; margin: 0; padding: 2rem; }
.status-bar { color: #94a3b8; margin-bottom: 1.5rem; }
.grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(240px, 1fr)); gap: 1rem; }
.topic-card { background: rgba(30, 41, 59, 0.7); border: 1px solid #334155; border-radius: 1.25rem; padding: 1.5rem; }
.topic-card h3 { margin: 0; color: #f8fafc; }
.topic-count { color: #94a3b8; font-size: 0.8rem; margin-top: 0.5rem; }
.page-flow-card { background: #1e293b; border: 1px solid #334155; border-radius: 1rem; padding: 1.5rem; margin-bottom: 1.5rem; }
.diagram { background: #0f172a; border: 1px solid #334155; border-radius: 0.8rem; padding: 1rem; margin-top: 1rem; }
.no-diagram { color: #64748b; font-size: 0.85rem; }
.diagram-fallback { border: 1px solid #ef4444; border-radius: 0.5rem; padding: 1rem; }
.diagram-fallback-banner { color: #f87171; }
.analysis { border: 1px solid rgba(56, 189, 248, 0.2); border-radius: 1rem; padding: 1.5rem; margin-top: 1rem; }
.failure { color: #ef4444; }
.tab-item { display: flex; gap: 0.5rem; align-items: center; padding: 0.3rem 0; }
.tab-icon { width: 16px; height: 16px; }
footer { color: #64748b; font-size: 0.75rem; margin-top: 2rem; }
"#;

/// Full HTML document for the current view.
pub fn render_dashboard(view: &DashboardView, status: &str, generated_at: DateTime<Local>) -> String {
    let body = match view {
        DashboardView::Empty(hint) => format!("<div class=\"empty\">{}</div>", escape_text(hint)),
        DashboardView::Summary(tabs) => render_summary(tabs),
        DashboardView::Topics(topics) => render_topic_cards(topics),
        DashboardView::Detail(detail) => render_topic_detail(detail),
    };
    format!(
        concat!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n",
            "<title>FlowTab</title>\n<style>{style}</style>\n</head>\n<body>\n",
            "<h1>FlowTab</h1>\n<div class=\"status-bar\">{status}</div>\n",
            "<main>\n{body}\n</main>\n<footer>Generated {generated}</footer>\n</body>\n</html>\n"
        ),
        style = STYLE,
        status = escape_text(status),
        body = body,
        generated = generated_at.format("%Y-%m-%d %H:%M:%S"),
    )
}

/// One card per topic with its page count.
pub fn render_topic_cards(topics: &[Topic]) -> String {
    let cards: String = topics
        .iter()
        .enumerate()
        .map(|(i, topic)| {
            format!(
                "<div class=\"topic-card\" data-topic=\"{}\"><h3>{}</h3><div class=\"topic-count\">{} pages grouped</div></div>",
                i + 1,
                escape_text(&topic.title),
                topic.tabs.len()
            )
        })
        .collect();
    format!("<div class=\"grid\">{cards}</div>")
}

/// Unclustered view: one card per extracted page.
pub fn render_summary(tabs: &[ExtractedTabData]) -> String {
    let cards: String = tabs
        .iter()
        .map(|tab| {
            format!(
                "<div class=\"topic-card\" data-tab=\"{}\">{}<h3>{}</h3></div>",
                escape_attribute(tab.tab_id.as_str()),
                icon(tab.favicon_url.as_deref()),
                escape_text(&tab.title)
            )
        })
        .collect();
    format!("<div class=\"grid\">{cards}</div>")
}

pub fn render_topic_detail(detail: &TopicDetail) -> String {
    let mut out = format!("<h2>{}</h2>\n", escape_text(&detail.topic.title));
    if let Some(failure) = &detail.failure {
        out.push_str(&format!("<div class=\"failure\">{}</div>\n", escape_text(failure)));
    }
    if let Some(synthesis) = &detail.synthesis {
        out.push_str(&render_synthesis(synthesis, detail));
    }

    out.push_str("<h3>Sources</h3>\n<div class=\"sources\">");
    for tab in &detail.topic.tabs {
        out.push_str(&format!(
            "<div class=\"tab-item\" data-tab=\"{}\">{}<a href=\"{}\">{}</a></div>",
            escape_attribute(tab.tab_id.as_str()),
            icon(tab.favicon_url.as_deref()),
            escape_attribute(&tab.url),
            escape_text(&tab.title)
        ));
    }
    out.push_str("</div>\n");
    out
}

fn render_synthesis(synthesis: &SynthesisResult, detail: &TopicDetail) -> String {
    let mut out = String::from("<section class=\"synthesis\">\n");
    let mut heading_written = false;
    for segment in &synthesis.segments {
        match segment {
            Segment::Preamble(text) => {
                out.push_str(&format!("<div class=\"preamble\">{}</div>\n", markdown_to_html(text)));
            }
            Segment::Item(card) => {
                if !heading_written {
                    out.push_str("<h2>📑 Page insights</h2>\n");
                    heading_written = true;
                }
                out.push_str(&format!(
                    "<div class=\"page-flow-card\"><h3>📄 {}</h3>",
                    escape_text(&card.title)
                ));
                for entry in &card.entries {
                    match entry {
                        ItemEntry::Narrative(text) => out.push_str(&markdown_to_html(text)),
                        ItemEntry::Diagram(slot) => {
                            let id = item_container_id(slot.block);
                            out.push_str(&render_container(detail.container(&id), &id));
                        }
                        ItemEntry::NoDiagram => {
                            out.push_str("<div class=\"diagram no-diagram\">No diagram available</div>");
                        }
                    }
                }
                out.push_str("</div>\n");
            }
            Segment::Overall(_) => {
                out.push_str("<h2>🔗 Overall relationships</h2>\n");
                out.push_str(&render_container(
                    detail.container(RELATION_CONTAINER_ID),
                    RELATION_CONTAINER_ID,
                ));
            }
            Segment::Analysis(text) => {
                out.push_str(&format!("<div class=\"analysis\">{}</div>\n", markdown_to_html(text)));
            }
        }
    }
    out.push_str("</section>\n");
    out
}

fn render_container(container: Option<&DiagramContainer>, id: &str) -> String {
    let inner = match container.map(DiagramContainer::content) {
        Some(ContainerContent::Rendered(svg)) => svg.clone(),
        Some(ContainerContent::Fallback(markup)) => markup.clone(),
        Some(ContainerContent::Source(text)) => {
            format!("<pre class=\"mermaid\">{}</pre>", escape_text(text))
        }
        Some(ContainerContent::Notice(text)) => escape_text(text).into_owned(),
        Some(ContainerContent::Empty) | None => String::new(),
    };
    format!("<div class=\"diagram\" id=\"{}\">{inner}</div>", escape_attribute(id))
}

fn icon(url: Option<&str>) -> String {
    let src = url.filter(|u| !u.trim().is_empty()).unwrap_or(DEFAULT_ICON);
    format!(
        "<img class=\"tab-icon\" src=\"{}\" onerror=\"this.onerror=null;this.src='{}'\">",
        escape_attribute(src),
        DEFAULT_ICON
    )
}

/// Render AI narrative markdown. Raw HTML in the text is shown literally.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}
