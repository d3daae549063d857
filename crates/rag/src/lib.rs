//! Retrieval client for the support agent
//!
//! Talks to the external vector-search service that holds the solar
//! knowledge base. The service embeds queries server-side, so this
//! crate only ships text and a `top_k` and gets ranked chunks back.

pub mod adapter;
pub mod vector_store;

pub use adapter::KnowledgeRetriever;
pub use vector_store::{VectorStore, VectorStoreConfig};

use thiserror::Error;

/// Retrieval errors
#[derive(Error, Debug)]
pub enum RagError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for RagError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RagError::Timeout
        } else {
            RagError::Network(err.to_string())
        }
    }
}

impl From<RagError> for heliodesk_core::Error {
    fn from(err: RagError) -> Self {
        heliodesk_core::Error::Retrieval(err.to_string())
    }
}
