//! Shared data types used across FlowTab crates.

mod api;
mod container;
mod tab;
mod topic;

pub use api::*;
pub use container::*;
pub use tab::*;
pub use topic::*;
