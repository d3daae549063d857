//! Conversation state
//!
//! The only entity with memory across requests: a bounded escalation
//! score and the previous turn's sentiment. One instance exists per
//! session; everything else in the pipeline is derived per-request.

use serde::{Deserialize, Serialize};

use crate::classification::Sentiment;

/// Lowest possible escalation score
pub const MIN_SCORE: u8 = 0;
/// Highest possible escalation score
pub const MAX_SCORE: u8 = 100;

/// Per-session escalation state
///
/// Invariant: `escalation_score` stays within `[MIN_SCORE, MAX_SCORE]`
/// after every mutation. All mutations go through [`apply_delta`] or
/// [`reset_score`] so the clamp cannot be skipped.
///
/// [`apply_delta`]: ConversationState::apply_delta
/// [`reset_score`]: ConversationState::reset_score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationState {
    pub escalation_score: u8,
    pub previous_sentiment: Sentiment,
}

impl Default for ConversationState {
    fn default() -> Self {
        Self {
            escalation_score: MIN_SCORE,
            previous_sentiment: Sentiment::Neutral,
        }
    }
}

impl ConversationState {
    /// Apply a signed delta to the score, saturating at the bounds.
    ///
    /// Returns the clamped score so callers read the post-clamp value
    /// in the same critical section that wrote it.
    pub fn apply_delta(&mut self, delta: i32) -> u8 {
        let next = (self.escalation_score as i32 + delta).clamp(MIN_SCORE as i32, MAX_SCORE as i32);
        self.escalation_score = next as u8;
        self.escalation_score
    }

    /// Drop the score back to zero (hand-off to human support)
    pub fn reset_score(&mut self) {
        self.escalation_score = MIN_SCORE;
    }
}

/// Result of one escalation-engine evaluation
///
/// `triggers` lists, in table order, the human-readable description of
/// every rule that fired for the message; it may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscalationUpdate {
    pub new_score: u8,
    pub triggers: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        let state = ConversationState::default();
        assert_eq!(state.escalation_score, 0);
        assert_eq!(state.previous_sentiment, Sentiment::Neutral);
    }

    #[test]
    fn test_apply_delta_clamps_high() {
        let mut state = ConversationState::default();
        assert_eq!(state.apply_delta(80), 80);
        assert_eq!(state.apply_delta(45), 100);
        assert_eq!(state.escalation_score, 100);
    }

    #[test]
    fn test_apply_delta_clamps_low() {
        let mut state = ConversationState {
            escalation_score: 5,
            previous_sentiment: Sentiment::Positive,
        };
        assert_eq!(state.apply_delta(-10), 0);
        assert_eq!(state.escalation_score, 0);
    }

    #[test]
    fn test_reset_score_keeps_sentiment_memory() {
        let mut state = ConversationState {
            escalation_score: 70,
            previous_sentiment: Sentiment::Negative,
        };
        state.reset_score();
        assert_eq!(state.escalation_score, 0);
        assert_eq!(state.previous_sentiment, Sentiment::Negative);
    }
}
