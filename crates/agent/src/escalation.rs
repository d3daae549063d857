//! Escalation scoring engine
//!
//! A deterministic state machine over the per-session
//! [`ConversationState`]: each message runs through a fixed table of
//! trigger checks, evaluated independently and in table order (several
//! may fire for one message). Fired deltas are summed and applied to
//! the running score in a single clamped update, and every fired rule
//! appends its human-readable description to the trigger list.
//!
//! The order-inquiry delta is applied by the orchestrator's
//! short-circuit branch, not by this table, but is exported from here
//! so all scoring policy lives in one module.

use heliodesk_core::{ConversationState, EscalationUpdate, Intent, Sentiment};

// Score deltas
const HUMAN_REQUEST: i32 = 30;
const FRUSTRATION: i32 = 15;
const ALL_CAPS: i32 = 5;
const EXCESSIVE_PUNCTUATION: i32 = 5;
const NEGATIVE_CONSECUTIVE: i32 = 10;
const AI_UNHELPFUL: i32 = 20;
const CANCEL_REFUND_COMPLAINT: i32 = 25;
const GRATITUDE: i32 = -10;

/// Delta applied by the orchestrator's order-inquiry short-circuit
pub const ORDER_INQUIRY_DELTA: i32 = 20;
/// Trigger description recorded by the order-inquiry short-circuit
pub const ORDER_INQUIRY_TRIGGER: &str = "Order inquiry";

// Trigger descriptions, surfaced verbatim in responses
const HUMAN_REQUEST_TRIGGER: &str = "Direct request for human agent";
const FRUSTRATION_TRIGGER: &str = "Expression of frustration";
const ALL_CAPS_TRIGGER: &str = "Use of all caps";
const EXCESSIVE_PUNCTUATION_TRIGGER: &str = "Excessive punctuation";
const NEGATIVE_CONSECUTIVE_TRIGGER: &str = "Negative sentiment in consecutive messages";
const AI_UNHELPFUL_TRIGGER: &str = "Explicit statement that the AI is not helping";
const CANCEL_REFUND_COMPLAINT_TRIGGER: &str =
    "Mention of wanting to cancel, get refunds, or file complaints";
const GRATITUDE_TRIGGER: &str = "Expressions of gratitude or satisfaction";

/// Escalation engine
#[derive(Debug, Default, Clone, Copy)]
pub struct EscalationEngine;

impl EscalationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate the trigger table for one message
    ///
    /// Pure: returns the summed delta and fired descriptions without
    /// touching any state. Checks run independently, in table order.
    pub fn evaluate(
        &self,
        text: &str,
        intent: Intent,
        sentiment: Sentiment,
        previous_sentiment: Sentiment,
    ) -> (i32, Vec<String>) {
        let lower = text.to_lowercase();
        let mut delta = 0;
        let mut triggers = Vec::new();

        let mut fire = |points: i32, description: &str| {
            delta += points;
            triggers.push(description.to_string());
        };

        if lower.contains("speak to human") || lower.contains("talk to agent") {
            fire(HUMAN_REQUEST, HUMAN_REQUEST_TRIGGER);
        }

        if sentiment == Sentiment::Negative {
            fire(FRUSTRATION, FRUSTRATION_TRIGGER);
        }

        if is_all_caps(text) && text.chars().count() > 10 {
            fire(ALL_CAPS, ALL_CAPS_TRIGGER);
        }

        if text.contains("!!!") || text.contains("???") {
            fire(EXCESSIVE_PUNCTUATION, EXCESSIVE_PUNCTUATION_TRIGGER);
        }

        if sentiment == Sentiment::Negative && previous_sentiment == Sentiment::Negative {
            fire(NEGATIVE_CONSECUTIVE, NEGATIVE_CONSECUTIVE_TRIGGER);
        }

        if lower.contains("not helping") {
            fire(AI_UNHELPFUL, AI_UNHELPFUL_TRIGGER);
        }

        if lower.contains("cancel") || lower.contains("refund") || lower.contains("complaint") {
            fire(CANCEL_REFUND_COMPLAINT, CANCEL_REFUND_COMPLAINT_TRIGGER);
        }

        if intent == Intent::Gratitude {
            fire(GRATITUDE, GRATITUDE_TRIGGER);
        }

        (delta, triggers)
    }

    /// Run the table for one message and apply the result to `state`
    ///
    /// The summed delta is applied in one clamped update; the caller
    /// must hold the session lock across this and any read of the
    /// returned score. `previous_sentiment` is read from the state but
    /// not advanced here, the orchestrator owns that transition.
    pub fn update(
        &self,
        text: &str,
        intent: Intent,
        sentiment: Sentiment,
        state: &mut ConversationState,
    ) -> EscalationUpdate {
        let (delta, triggers) = self.evaluate(text, intent, sentiment, state.previous_sentiment);
        let new_score = state.apply_delta(delta);

        if !triggers.is_empty() {
            tracing::debug!(delta, new_score, ?triggers, "Escalation triggers fired");
        }

        EscalationUpdate { new_score, triggers }
    }
}

/// Uppercase check over cased characters only, true only when at least
/// one cased character exists and none are lowercase
fn is_all_caps(text: &str) -> bool {
    let mut has_cased = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_cased = true;
        }
    }
    has_cased
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(score: u8, previous: Sentiment) -> ConversationState {
        ConversationState {
            escalation_score: score,
            previous_sentiment: previous,
        }
    }

    fn engine() -> EscalationEngine {
        EscalationEngine::new()
    }

    #[test]
    fn test_no_triggers_for_calm_message() {
        let mut s = state(10, Sentiment::Neutral);
        let update = engine().update(
            "tell me about panel warranties",
            Intent::GeneralInquiry,
            Sentiment::Neutral,
            &mut s,
        );
        assert_eq!(update.new_score, 10);
        assert!(update.triggers.is_empty());
    }

    #[test]
    fn test_human_request() {
        let mut s = state(0, Sentiment::Neutral);
        let update = engine().update(
            "I want to speak to human",
            Intent::ConnectionRequest,
            Sentiment::Neutral,
            &mut s,
        );
        assert_eq!(update.new_score, 30);
        assert_eq!(update.triggers, vec![HUMAN_REQUEST_TRIGGER]);
    }

    #[test]
    fn test_five_trigger_scenario() {
        let mut s = state(0, Sentiment::Negative);
        let update = engine().update(
            "I want to cancel and get a refund, this is not helping!!!",
            Intent::GeneralInquiry,
            Sentiment::Negative,
            &mut s,
        );
        assert_eq!(
            update.triggers,
            vec![
                FRUSTRATION_TRIGGER,
                EXCESSIVE_PUNCTUATION_TRIGGER,
                NEGATIVE_CONSECUTIVE_TRIGGER,
                AI_UNHELPFUL_TRIGGER,
                CANCEL_REFUND_COMPLAINT_TRIGGER,
            ]
        );
        // 15 + 5 + 10 + 20 + 25
        assert_eq!(update.new_score, 75);
    }

    #[test]
    fn test_five_trigger_scenario_clamps_from_high_start() {
        let mut s = state(30, Sentiment::Negative);
        let update = engine().update(
            "I want to cancel and get a refund, this is not helping!!!",
            Intent::GeneralInquiry,
            Sentiment::Negative,
            &mut s,
        );
        assert_eq!(update.new_score, 100);
        assert_eq!(s.escalation_score, 100);
    }

    #[test]
    fn test_consecutive_cancel_messages_saturate() {
        let mut s = state(0, Sentiment::Neutral);
        for _ in 0..10 {
            let update = engine().update(
                "cancel my contract",
                Intent::GeneralInquiry,
                Sentiment::Negative,
                &mut s,
            );
            assert!(update.new_score <= 100);
            s.previous_sentiment = Sentiment::Negative;
        }
        assert_eq!(s.escalation_score, 100);
    }

    #[test]
    fn test_all_caps_requires_length_and_case() {
        let e = engine();
        let (delta, triggers) = e.evaluate(
            "WHY IS MY INSTALL LATE",
            Intent::GeneralInquiry,
            Sentiment::Neutral,
            Sentiment::Neutral,
        );
        assert_eq!(delta, ALL_CAPS);
        assert_eq!(triggers, vec![ALL_CAPS_TRIGGER]);

        // Too short
        let (delta, _) = e.evaluate("WHY LATE", Intent::GeneralInquiry, Sentiment::Neutral, Sentiment::Neutral);
        assert_eq!(delta, 0);

        // Mixed case
        let (delta, _) = e.evaluate(
            "WHY IS MY INSTALL late",
            Intent::GeneralInquiry,
            Sentiment::Neutral,
            Sentiment::Neutral,
        );
        assert_eq!(delta, 0);

        // Digits and punctuation alone are not cased
        let (delta, _) = e.evaluate(
            "12345 67890 ???",
            Intent::GeneralInquiry,
            Sentiment::Neutral,
            Sentiment::Neutral,
        );
        assert_eq!(delta, EXCESSIVE_PUNCTUATION);
    }

    #[test]
    fn test_consecutive_negativity_needs_both_turns() {
        let e = engine();
        let (delta, _) = e.evaluate(
            "this is awful",
            Intent::GeneralInquiry,
            Sentiment::Negative,
            Sentiment::Neutral,
        );
        assert_eq!(delta, FRUSTRATION);

        let (delta, triggers) = e.evaluate(
            "this is awful",
            Intent::GeneralInquiry,
            Sentiment::Negative,
            Sentiment::Negative,
        );
        assert_eq!(delta, FRUSTRATION + NEGATIVE_CONSECUTIVE);
        assert_eq!(
            triggers,
            vec![FRUSTRATION_TRIGGER, NEGATIVE_CONSECUTIVE_TRIGGER]
        );
    }

    #[test]
    fn test_gratitude_discount_clamps_at_zero() {
        let mut s = state(5, Sentiment::Neutral);
        let update = engine().update(
            "thanks, all sorted",
            Intent::Gratitude,
            Sentiment::Positive,
            &mut s,
        );
        assert_eq!(update.triggers, vec![GRATITUDE_TRIGGER]);
        assert_eq!(update.new_score, 0);

        let mut s = state(50, Sentiment::Neutral);
        let update = engine().update(
            "thank you",
            Intent::Gratitude,
            Sentiment::Positive,
            &mut s,
        );
        assert_eq!(update.new_score, 40);
    }

    #[test]
    fn test_trigger_order_matches_table() {
        let mut s = state(0, Sentiment::Negative);
        let update = engine().update(
            "SPEAK TO HUMAN, THIS REFUND IS NOT HELPING!!!",
            Intent::ConnectionRequest,
            Sentiment::Negative,
            &mut s,
        );
        assert_eq!(
            update.triggers,
            vec![
                HUMAN_REQUEST_TRIGGER,
                FRUSTRATION_TRIGGER,
                ALL_CAPS_TRIGGER,
                EXCESSIVE_PUNCTUATION_TRIGGER,
                NEGATIVE_CONSECUTIVE_TRIGGER,
                AI_UNHELPFUL_TRIGGER,
                CANCEL_REFUND_COMPLAINT_TRIGGER,
            ]
        );
        // 30 + 15 + 5 + 5 + 10 + 20 + 25 = 110, clamped
        assert_eq!(update.new_score, 100);
    }

    #[test]
    fn test_update_does_not_advance_previous_sentiment() {
        let mut s = state(0, Sentiment::Neutral);
        engine().update("this is awful", Intent::GeneralInquiry, Sentiment::Negative, &mut s);
        assert_eq!(s.previous_sentiment, Sentiment::Neutral);
    }
}
