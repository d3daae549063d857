//! Orchestrator output contract

use crate::classification::{Department, Intent, Sentiment};

/// Fully-classified answer for one message
///
/// `escalation_score` is the post-clamp value read in the same critical
/// section that produced it; the HTTP layer renders it as `"N/100"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub text: String,
    pub intent: Intent,
    pub department: Department,
    pub sentiment: Sentiment,
    pub escalation_score: u8,
    pub triggers: Vec<String>,
}

/// What the orchestrator hands back to the API surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentOutcome {
    /// Full answer shape, classification fields included
    Answer(Answer),
    /// Human hand-off: callers only see the fixed message
    Handoff { message: String },
}

impl AgentOutcome {
    /// Convenience for tests and logging
    pub fn answer_text(&self) -> &str {
        match self {
            AgentOutcome::Answer(answer) => &answer.text,
            AgentOutcome::Handoff { message } => message,
        }
    }
}
