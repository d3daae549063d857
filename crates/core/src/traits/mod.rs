//! Core traits for the support agent system
//!
//! All external collaborators and replaceable heuristics sit behind
//! these traits:
//!
//! ```text
//! Classification:
//!   - SentimentClassifier: text -> {Positive, Neutral, Negative}
//!   - IntentClassifier:    text -> intent label
//!   - DepartmentClassifier: text -> department label
//!
//! Retrieval:
//!   - Retriever: namespace-scoped context search for RAG
//!
//! Generation:
//!   - LanguageModel: prompt -> answer text
//! ```
//!
//! The orchestrator owns `Arc<dyn ...>` handles only, so rule-based
//! classifiers can be swapped for model-backed ones without touching
//! the pipeline.

mod classify;
mod llm;
mod retriever;

pub use classify::{DepartmentClassifier, IntentClassifier, SentimentClassifier};
pub use llm::LanguageModel;
pub use retriever::{RetrieveOptions, RetrievedChunk, Retriever};
