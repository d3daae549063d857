//! Lexicon-based sentiment analyzer
//!
//! Computes a compound polarity score in [-1, 1] from a compact
//! valence lexicon: token valences are summed with negation damping,
//! booster adjustment, and exclamation emphasis, then normalized.
//! The label thresholds live in [`Sentiment::from_compound`]: >= 0.05
//! Positive, <= -0.05 Negative, Neutral between.
//!
//! This is a deterministic stand-in for a full sentiment model; swap
//! in a model-backed `SentimentClassifier` without touching callers.

use heliodesk_core::{Sentiment, SentimentClassifier};

/// Normalization constant for the compound score
const NORMALIZATION_ALPHA: f64 = 15.0;

/// Valence multiplier applied when a token is negated
const NEGATION_DAMPENER: f64 = -0.74;

/// Valence adjustment contributed by a booster word
const BOOST_INCREMENT: f64 = 0.293;

/// Emphasis added per exclamation mark (counted up to [`MAX_EXCLAMATIONS`])
const EXCLAMATION_EMPHASIS: f64 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;

/// How many preceding tokens a negator reaches
const NEGATION_WINDOW: usize = 3;

/// (token, valence) pairs, customer-support weighted
const LEXICON: &[(&str, f64)] = &[
    // Positive
    ("amazing", 2.8),
    ("appreciate", 2.0),
    ("awesome", 3.1),
    ("best", 3.2),
    ("better", 1.9),
    ("easy", 1.9),
    ("excellent", 2.7),
    ("fine", 0.8),
    ("flawlessly", 2.2),
    ("good", 1.9),
    ("great", 3.1),
    ("happy", 2.7),
    ("help", 1.7),
    ("helpful", 1.8),
    ("helping", 1.2),
    ("love", 3.2),
    ("nice", 1.8),
    ("perfect", 2.7),
    ("resolved", 1.4),
    ("seamless", 1.3),
    ("thank", 1.5),
    ("thankful", 2.0),
    ("thanks", 1.9),
    ("wonderful", 2.7),
    // Negative
    ("angry", -2.3),
    ("annoyed", -1.9),
    ("awful", -3.0),
    ("bad", -2.5),
    ("broken", -1.9),
    ("cancel", -1.3),
    ("complaint", -1.6),
    ("delay", -1.2),
    ("delays", -1.3),
    ("disappointed", -2.2),
    ("error", -1.4),
    ("errors", -1.5),
    ("excuses", -1.1),
    ("fail", -2.3),
    ("failed", -2.1),
    ("failure", -2.4),
    ("frustrated", -2.1),
    ("frustrating", -2.2),
    ("hate", -2.7),
    ("horrible", -2.9),
    ("issue", -1.3),
    ("issues", -1.4),
    ("poor", -1.9),
    ("problem", -1.6),
    ("problems", -1.7),
    ("refund", -0.9),
    ("ridiculous", -2.2),
    ("scam", -2.6),
    ("slow", -1.2),
    ("stupid", -2.4),
    ("terrible", -3.1),
    ("unacceptable", -2.5),
    ("useless", -1.8),
    ("waste", -1.8),
    ("worst", -3.1),
    ("wrong", -2.1),
];

/// Tokens that flip the valence of a following lexicon word
const NEGATORS: &[&str] = &[
    "aren't", "can't", "cannot", "couldn't", "didn't", "doesn't", "don't", "isn't", "never", "no",
    "not", "nothing", "wasn't", "won't", "wouldn't",
];

/// (token, boost) pairs amplifying or damping a following valence word
const BOOSTERS: &[(&str, f64)] = &[
    ("absolutely", BOOST_INCREMENT),
    ("completely", BOOST_INCREMENT),
    ("extremely", BOOST_INCREMENT),
    ("really", BOOST_INCREMENT),
    ("so", BOOST_INCREMENT),
    ("totally", BOOST_INCREMENT),
    ("very", BOOST_INCREMENT),
    ("barely", -BOOST_INCREMENT),
    ("slightly", -BOOST_INCREMENT),
    ("somewhat", -BOOST_INCREMENT),
];

/// Lexicon sentiment analyzer
#[derive(Debug, Default, Clone, Copy)]
pub struct SentimentAnalyzer;

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Compound polarity score in [-1, 1]
    pub fn compound(&self, text: &str) -> f64 {
        let tokens = tokenize(text);
        let mut sum = 0.0;

        for (i, token) in tokens.iter().enumerate() {
            let Some(mut valence) = lexicon_valence(token) else {
                continue;
            };

            // Boosters in the two preceding tokens
            let booster_start = i.saturating_sub(2);
            for previous in &tokens[booster_start..i] {
                if let Some(boost) = booster_value(previous) {
                    valence += if valence >= 0.0 { boost } else { -boost };
                }
            }

            // Negation within the window flips and dampens
            let negation_start = i.saturating_sub(NEGATION_WINDOW);
            if tokens[negation_start..i].iter().any(|t| is_negator(t)) {
                valence *= NEGATION_DAMPENER;
            }

            sum += valence;
        }

        if sum != 0.0 {
            let exclamations = text.chars().filter(|c| *c == '!').count().min(MAX_EXCLAMATIONS);
            let emphasis = exclamations as f64 * EXCLAMATION_EMPHASIS;
            sum += if sum > 0.0 { emphasis } else { -emphasis };
        }

        sum / (sum * sum + NORMALIZATION_ALPHA).sqrt()
    }
}

impl SentimentClassifier for SentimentAnalyzer {
    fn classify(&self, text: &str) -> Sentiment {
        Sentiment::from_compound(self.compound(text))
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .replace('\u{2019}', "'")
        .split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

fn lexicon_valence(token: &str) -> Option<f64> {
    LEXICON
        .iter()
        .find(|(word, _)| *word == token)
        .map(|(_, valence)| *valence)
}

fn is_negator(token: &str) -> bool {
    NEGATORS.contains(&token)
}

fn booster_value(token: &str) -> Option<f64> {
    BOOSTERS
        .iter()
        .find(|(word, _)| *word == token)
        .map(|(_, boost)| *boost)
}
