//! Rule-based intent detection
//!
//! Priority-ordered case-insensitive substring rules over a closed
//! label set; the first table row that matches wins. A deliberate
//! placeholder for a trained classifier behind the same trait.

use heliodesk_core::{Intent, IntentClassifier};

const INFORMATION_SEEKING: &[&str] = &["how do i", "how to"];
const PROBLEM_SOLVING: &[&str] = &["problem", "issue"];
const CONNECTION_REQUEST: &[&str] = &["speak to human", "talk to agent"];
const GRATITUDE: &[&str] = &["thank you", "thanks", "thankful"];

/// Substring-rule intent detector
#[derive(Debug, Default, Clone, Copy)]
pub struct IntentDetector;

impl IntentDetector {
    pub fn new() -> Self {
        Self
    }
}

impl IntentClassifier for IntentDetector {
    fn classify(&self, text: &str) -> Intent {
        let lower = text.to_lowercase();
        let matches = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));

        if matches(INFORMATION_SEEKING) {
            Intent::InformationSeeking
        } else if matches(PROBLEM_SOLVING) {
            Intent::ProblemSolving
        } else if matches(CONNECTION_REQUEST) {
            Intent::ConnectionRequest
        } else if matches(GRATITUDE) {
            Intent::Gratitude
        } else {
            Intent::GeneralInquiry
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(text: &str) -> Intent {
        IntentDetector::new().classify(text)
    }

    #[test]
    fn test_each_label_reachable() {
        assert_eq!(classify("How do I clean my panels?"), Intent::InformationSeeking);
        assert_eq!(classify("How to size an inverter"), Intent::InformationSeeking);
        assert_eq!(classify("There is a problem with billing"), Intent::ProblemSolving);
        assert_eq!(classify("I found an issue"), Intent::ProblemSolving);
        assert_eq!(classify("Let me speak to human"), Intent::ConnectionRequest);
        assert_eq!(classify("I want to talk to agent now"), Intent::ConnectionRequest);
        assert_eq!(classify("thanks, that worked"), Intent::Gratitude);
        assert_eq!(classify("Thank you so much"), Intent::Gratitude);
        assert_eq!(classify("what about net metering"), Intent::GeneralInquiry);
    }

    #[test]
    fn test_priority_order() {
        // Information seeking outranks problem solving
        assert_eq!(
            classify("how to fix this problem"),
            Intent::InformationSeeking
        );
        // Problem solving outranks connection request
        assert_eq!(
            classify("this issue means I must speak to human"),
            Intent::ProblemSolving
        );
        // Connection request outranks gratitude
        assert_eq!(
            classify("thanks but let me talk to agent"),
            Intent::ConnectionRequest
        );
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(classify("HOW DO I READ MY METER"), Intent::InformationSeeking);
        assert_eq!(classify("SPEAK TO HUMAN"), Intent::ConnectionRequest);
    }

    #[test]
    fn test_idempotent() {
        let detector = IntentDetector::new();
        let text = "thanks for sorting out the issue";
        assert_eq!(detector.classify(text), detector.classify(text));
    }
}
