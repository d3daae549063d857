//! Retrieval trait for RAG

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Context retriever interface
///
/// Implementations:
/// - `KnowledgeRetriever` - namespace-scoped vector search backend
///
/// # Example
///
/// ```ignore
/// let retriever: Arc<dyn Retriever> = Arc::new(KnowledgeRetriever::new(store));
/// let options = RetrieveOptions::default().with_top_k(3);
/// let chunks = retriever.retrieve("solar panel efficiency", &options).await?;
/// ```
#[async_trait]
pub trait Retriever: Send + Sync + 'static {
    /// Retrieve relevant text chunks for a query
    ///
    /// Chunks come back in the backend's own relevance order; callers
    /// must not reorder them. Failures map to
    /// [`Error::Retrieval`](crate::Error::Retrieval).
    async fn retrieve(&self, query: &str, options: &RetrieveOptions) -> Result<Vec<RetrievedChunk>>;

    /// Retriever name for logging
    fn name(&self) -> &str;
}

/// Retrieval options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrieveOptions {
    /// Number of chunks to return
    pub top_k: usize,
}

impl Default for RetrieveOptions {
    fn default() -> Self {
        Self { top_k: 3 }
    }
}

impl RetrieveOptions {
    /// Set top_k
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }
}

/// A retrieved text chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievedChunk {
    /// Chunk text as stored in the knowledge base
    pub text: String,
}

impl RetrievedChunk {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}
