//! # FlowTab Synthesis
//!
//! Turns a set of open tabs into topic groups and multi-page insight reports.
//!
//! - [`parser`] - Recovers structured grouping replies and Mermaid fences from AI text
//! - [`composer`] - Interleaves diagram blocks into per-page insight cards
//! - [`session`] - The [`Dashboard`] controller driving scan, cluster and synthesis
//! - [`view`] - Static HTML rendering of the dashboard state

pub mod composer;
pub mod error;
pub mod parser;
pub mod prompts;
pub mod session;
pub mod view;

pub use composer::{compose, DiagramSlot, ItemCard, ItemEntry, Segment, SynthesisResult, ITEM_MARKER};
pub use error::DashboardError;
pub use parser::{extract_diagram_blocks, parse_grouping_response, resolve_topics};
pub use prompts::{clustering_prompt, synthesis_prompt};
pub use session::{
    item_container_id, Dashboard, DashboardSettings, DashboardView, TopicDetail,
    RELATION_CONTAINER_ID,
};
pub use view::{markdown_to_html, render_dashboard, render_summary, render_topic_cards, render_topic_detail};
