//! # FlowTab Protocols
//!
//! Collaborator traits and shared data types for FlowTab.
//! Contains only interface definitions - no implementations.
//!
//! ## Core Traits
//!
//! - [`TabSource`] - Enumerates, activates and closes browser tabs
//! - [`ContentExtractor`] - Pulls readable text out of a single tab
//! - [`ChatProvider`] - Sends one free-text prompt to an AI chat endpoint
//! - [`RenderEngine`] - Turns diagram source inside a container into a rendering

pub mod error;
pub mod provider;
pub mod render;
pub mod tab;
pub mod types;

pub use error::{ExtractionError, ProviderError, RenderError, TabSourceError};
pub use provider::ChatProvider;
pub use render::RenderEngine;
pub use tab::{ContentExtractor, TabSource};
pub use types::*;
