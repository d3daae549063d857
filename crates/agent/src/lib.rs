//! Support agent
//!
//! The domain core of the backend: rule-based classifiers, the
//! escalation-scoring engine, and the conversation orchestrator that
//! ties them to retrieval and generation.

pub mod agent;
pub mod analyzer;
pub mod department;
pub mod escalation;
pub mod intent;

pub use agent::{AgentConfig, SupportAgent};
pub use analyzer::SentimentAnalyzer;
pub use department::DepartmentRouter;
pub use escalation::{EscalationEngine, ORDER_INQUIRY_DELTA, ORDER_INQUIRY_TRIGGER};
pub use intent::IntentDetector;
