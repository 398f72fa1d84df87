//! Interleaves synthesis narrative with diagram slots.
//!
//! The synthesis reply is expected to follow the prompt layout: an optional
//! preamble, one `### 📄` section per source page, then level-2 sections
//! for the relationship diagram and the cross-page analysis. Replies that
//! drift from the layout still compose; missing parts are simply absent.

use std::sync::LazyLock;

use flowtab_diagram::DiagramSource;
use regex::Regex;

use crate::parser::MERMAID_FENCE;

/// Marker introducing one page's section.
pub const ITEM_MARKER: &str = "### 📄";

/// Stands in for a fenced diagram while the text is split.
const PLACEHOLDER: char = '\u{FFFC}';

static ITEM_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"###\s*📄\s*").expect("valid item marker pattern"));
static OVERVIEW_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^##\s*1\.[^\n]*\n?").expect("valid heading pattern"));
static LEVEL_TWO_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^##[ \t]").expect("valid heading pattern"));
static ANALYSIS_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^##\s*3\.").expect("valid heading pattern"));
static FLOW_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\*\*(?:🗺️?\s*)?(?:content flow(?: diagram)?|内容流向?图)\*\*[:：]?[ \t]*")
        .expect("valid label pattern")
});
static DASH_RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*-{3,}[ \t]*$").expect("valid rule pattern"));

/// A diagram block assigned to a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramSlot {
    /// Position of the block in the extracted block list.
    pub block: usize,
    pub source: DiagramSource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemEntry {
    /// Markdown narrative.
    Narrative(String),
    Diagram(DiagramSlot),
    /// Slot that has no diagram block left to show.
    NoDiagram,
}

/// One page's card: its heading plus interleaved narrative and diagrams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemCard {
    pub title: String,
    pub entries: Vec<ItemEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Preamble(String),
    Item(ItemCard),
    /// Trailing relationship diagram built from the first leftover block.
    Overall(DiagramSlot),
    Analysis(String),
}

/// Ordered output of [`compose`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SynthesisResult {
    pub segments: Vec<Segment>,
}

impl SynthesisResult {
    pub fn items(&self) -> impl Iterator<Item = &ItemCard> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Item(card) => Some(card),
            _ => None,
        })
    }

    /// Every diagram slot, per-item ones first, in display order.
    pub fn diagrams(&self) -> Vec<&DiagramSlot> {
        let mut slots = Vec::new();
        for segment in &self.segments {
            match segment {
                Segment::Item(card) => {
                    slots.extend(card.entries.iter().filter_map(|entry| match entry {
                        ItemEntry::Diagram(slot) => Some(slot),
                        _ => None,
                    }));
                }
                Segment::Overall(slot) => slots.push(slot),
                _ => {}
            }
        }
        slots
    }

    pub fn notice_count(&self) -> usize {
        self.items()
            .flat_map(|card| card.entries.iter())
            .filter(|entry| matches!(entry, ItemEntry::NoDiagram))
            .count()
    }

    pub fn overall(&self) -> Option<&DiagramSlot> {
        self.segments.iter().find_map(|segment| match segment {
            Segment::Overall(slot) => Some(slot),
            _ => None,
        })
    }
}

/// Build the display sequence for a synthesis reply.
///
/// Fences in `raw_text` mark where diagrams go; `blocks` supplies what is
/// shown there, consumed strictly in order.
pub fn compose(raw_text: &str, blocks: &[String]) -> SynthesisResult {
    let placeholder = PLACEHOLDER.to_string();
    let processed = MERMAID_FENCE.replace_all(raw_text, placeholder.as_str());
    let mut next_block = 0usize;
    let mut segments = Vec::new();

    let mut sections = ITEM_SPLIT.split(&processed);
    if let Some(head) = sections.next() {
        let head = OVERVIEW_HEADING.replace_all(head, "");
        let preamble = strip_placeholders(before_level_two(&head));
        if !preamble.is_empty() {
            segments.push(Segment::Preamble(preamble));
        }
    }

    for section in sections {
        if section.trim().is_empty() {
            continue;
        }
        let body = before_level_two(section);
        segments.push(Segment::Item(compose_item(body, blocks, &mut next_block)));
    }

    if let Some(text) = blocks.get(next_block) {
        segments.push(Segment::Overall(DiagramSlot {
            block: next_block,
            source: DiagramSource::new(text.clone()),
        }));
    }

    if let Some(found) = ANALYSIS_HEADING.find(&processed) {
        let analysis = strip_placeholders(&processed[found.start()..]);
        if !analysis.is_empty() {
            segments.push(Segment::Analysis(analysis));
        }
    }

    SynthesisResult { segments }
}

fn compose_item(body: &str, blocks: &[String], next_block: &mut usize) -> ItemCard {
    let (title, rest) = match body.split_once('\n') {
        Some((first, rest)) => (first.trim(), rest),
        None => (body.trim(), ""),
    };
    let mut entries = Vec::new();
    let mut pieces = rest.split(PLACEHOLDER).peekable();
    let has_placeholder = rest.contains(PLACEHOLDER);

    while let Some(piece) = pieces.next() {
        let narrative = clean_item_narrative(piece);
        if !narrative.is_empty() {
            entries.push(ItemEntry::Narrative(narrative));
        }
        if pieces.peek().is_some() {
            entries.push(take_block(blocks, next_block));
        }
    }
    if !has_placeholder {
        entries.push(ItemEntry::NoDiagram);
    }

    ItemCard {
        title: title.to_string(),
        entries,
    }
}

fn take_block(blocks: &[String], next_block: &mut usize) -> ItemEntry {
    match blocks.get(*next_block) {
        Some(text) => {
            let slot = DiagramSlot {
                block: *next_block,
                source: DiagramSource::new(text.clone()),
            };
            *next_block += 1;
            ItemEntry::Diagram(slot)
        }
        None => ItemEntry::NoDiagram,
    }
}

fn before_level_two(text: &str) -> &str {
    match LEVEL_TWO_HEADING.find(text) {
        Some(m) => &text[..m.start()],
        None => text,
    }
}

fn strip_placeholders(text: &str) -> String {
    text.replace(PLACEHOLDER, "").trim().to_string()
}

fn clean_item_narrative(text: &str) -> String {
    let text = FLOW_LABEL.replace_all(text, "");
    DASH_RULE.replace_all(&text, "").trim().to_string()
}

#[cfg(test)]
#[path = "composer_tests.rs"]
mod tests;
