//! Diagram render engine errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Diagram syntax error: {0}")]
    Syntax(String),

    #[error("Container has no diagram source")]
    EmptyContainer,

    #[error("Render engine unavailable: {0}")]
    Unavailable(String),
}
