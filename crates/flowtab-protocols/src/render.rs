//! Diagram render engine protocol.

use async_trait::async_trait;

use crate::error::RenderError;
use crate::types::DiagramContainer;

/// External diagram renderer.
///
/// Reads the diagram source written into the container and, on success,
/// replaces it with the rendering. Syntax errors are reported as
/// [`RenderError`] and leave the container content unspecified.
#[async_trait]
pub trait RenderEngine: Send + Sync {
    async fn run(&self, container: &mut DiagramContainer) -> Result<(), RenderError>;
}
