//! AI chat client for FlowTab.
//!
//! One [`ChatClient`] speaks both the chat-completion envelope used by
//! OpenAI-compatible services and the generate-content envelope used by
//! Gemini, chosen from the configured endpoint.

mod api;
mod client;

pub use api::Envelope;
pub use client::ChatClient;
