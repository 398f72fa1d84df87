//! # FlowTab Diagram
//!
//! Best-effort repair and rendering of LLM-generated Mermaid source.
//!
//! ```text
//! text ──► sanitize ──► render attempt ──► ok
//!                           │ fail
//!                           ▼
//!                      deep_clean + wait ──► next attempt ... ──► fallback view
//! ```
//!
//! - [`sanitize`] applies deterministic rewrites for common LLM mistakes.
//! - [`SafeRenderer`] drives a [`RenderEngine`](flowtab_protocols::RenderEngine)
//!   with retries that trade fidelity for renderability.
//! - [`MarkupFallback`] shows the escaped source plus a retry button when
//!   every attempt failed.
//! - [`MermaidInkEngine`] renders through a mermaid.ink compatible service.

mod fallback;
mod ink;
mod renderer;
mod sanitizer;

pub use fallback::{present_fallback, FallbackPresenter, MarkupFallback};
pub use ink::MermaidInkEngine;
pub use renderer::{AttemptOutcome, RenderAttempt, RenderOptions, RenderReport, SafeRenderer};
pub use sanitizer::{deep_clean, detect_kind, sanitize, DiagramKind, DiagramSource, DEFAULT_DECLARATION};
