//! Core traits and types for the support agent
//!
//! This crate provides the shared vocabulary used across all other crates:
//! - Classification labels (sentiment, intent, department)
//! - Conversation state and escalation types
//! - Generation request/response types
//! - Core traits for pluggable backends (classifiers, retriever, LLM)
//! - Error types

pub mod answer;
pub mod classification;
pub mod conversation;
pub mod error;
pub mod llm_types;
pub mod traits;

pub use answer::{AgentOutcome, Answer};
pub use classification::{ClassificationResult, Department, Intent, Sentiment};
pub use conversation::{ConversationState, EscalationUpdate, MAX_SCORE, MIN_SCORE};
pub use error::{Error, Result};
pub use llm_types::{FinishReason, GenerateRequest, GenerateResponse};

pub use traits::{
    // Classification
    DepartmentClassifier, IntentClassifier, SentimentClassifier,
    // Generation
    LanguageModel,
    // Retrieval
    RetrieveOptions, RetrievedChunk, Retriever,
};
