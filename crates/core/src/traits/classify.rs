//! Classifier traits
//!
//! Classifiers are pure and total: every input maps to exactly one
//! label, the same input always maps to the same label, and no state
//! is read or written. Implementations must uphold that contract --
//! the orchestrator calls them before taking any lock.

use crate::classification::{Department, Intent, Sentiment};

/// Maps free text to a sentiment label
pub trait SentimentClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Sentiment;
}

/// Maps free text to an intent label
pub trait IntentClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Intent;
}

/// Maps free text to a department label
pub trait DepartmentClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Department;
}
