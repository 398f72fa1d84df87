//! Error types for the FlowTab protocol layer.

mod extraction;
mod provider;
mod render;
mod tab;

pub use extraction::*;
pub use provider::*;
pub use render::*;
pub use tab::*;
