//! Generation backend for the support agent
//!
//! Wraps the external text-generation service behind the core
//! `LanguageModel` trait.

pub mod backend;

pub use backend::{GeminiBackend, LlmConfig};

use thiserror::Error;

/// LLM errors
#[derive(Error, Debug)]
pub enum LlmError {
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

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Network(err.to_string())
        }
    }
}

impl From<LlmError> for heliodesk_core::Error {
    fn from(err: LlmError) -> Self {
        heliodesk_core::Error::Generation(err.to_string())
    }
}
