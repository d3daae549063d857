//! Error types shared across the workspace

use thiserror::Error;

/// Top-level error for the support agent pipeline
///
/// Crate-local errors (`RagError`, `LlmError`, ...) convert into these
/// variants at the crate seams, so the orchestrator and the HTTP layer
/// only ever match on this enum.
#[derive(Debug, Error)]
pub enum Error {
    /// User-correctable input error (maps to HTTP 400)
    #[error("validation error: {0}")]
    Validation(String),

    /// Vector-search backend unreachable or errored
    #[error("retrieval error: {0}")]
    Retrieval(String),

    /// Text-generation backend failure
    #[error("generation error: {0}")]
    Generation(String),

    /// Pipeline produced a result missing expected fields; masked
    /// behind the apology body at the HTTP boundary
    #[error("incomplete result: {0}")]
    IncompleteResult(String),
}

/// Result alias used throughout the workspace
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Short stable name for metrics/log labels
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Validation(_) => "validation",
            Error::Retrieval(_) => "retrieval",
            Error::Generation(_) => "generation",
            Error::IncompleteResult(_) => "incomplete_result",
        }
    }
}
