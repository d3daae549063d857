//! Configuration for the support agent
//!
//! Layered settings (files + environment) plus the policy text the
//! pipeline serves: canned responses, the escalation demand phrases,
//! and the QnA prompt template. Policy strings live here, not in the
//! orchestrator, so they can be changed without touching logic.

pub mod settings;
pub mod templates;

pub use settings::{
    load_settings, GenerationConfig, ObservabilityConfig, RetrievalConfig, RoutingConfig,
    RuntimeEnvironment, ServerConfig, SessionConfig, Settings,
};
pub use templates::{PromptTemplate, ResponseTemplates};

use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}
