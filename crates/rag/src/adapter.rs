//! Adapter implementing the core Retriever trait
//!
//! Bridges the vector store client with the core `Retriever` interface
//! so the orchestrator never sees the backend wire dialect.

use std::sync::Arc;

use async_trait::async_trait;

use heliodesk_core::{Result, RetrieveOptions, RetrievedChunk, Retriever};

use crate::VectorStore;

/// Knowledge-base retriever backed by the vector store
pub struct KnowledgeRetriever {
    store: Arc<VectorStore>,
}

impl KnowledgeRetriever {
    /// Create a new retriever over the given store
    pub fn new(store: Arc<VectorStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Retriever for KnowledgeRetriever {
    async fn retrieve(&self, query: &str, options: &RetrieveOptions) -> Result<Vec<RetrievedChunk>> {
        let chunks = self.store.search(query, options.top_k).await?;
        Ok(chunks.into_iter().map(RetrievedChunk::new).collect())
    }

    fn name(&self) -> &str {
        self.store.namespace()
    }
}
