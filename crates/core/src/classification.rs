//! Classification labels
//!
//! Closed label sets produced by the sentiment, intent, and department
//! classifiers. Serialized forms match the wire contract of the `/ask`
//! endpoint, so renames here are load-bearing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Message sentiment derived from a lexicon compound score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    /// Threshold on the compound polarity score in [-1, 1].
    ///
    /// `>= 0.05` is Positive, `<= -0.05` is Negative, the band between
    /// maps to Neutral. Boundary values belong to the polar labels.
    pub fn from_compound(compound: f64) -> Self {
        if compound >= 0.05 {
            Sentiment::Positive
        } else if compound <= -0.05 {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Neutral => "Neutral",
            Sentiment::Negative => "Negative",
        }
    }

    pub fn is_negative(&self) -> bool {
        matches!(self, Sentiment::Negative)
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conversational intent of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    #[serde(rename = "Information Seeking")]
    InformationSeeking,
    #[serde(rename = "Problem Solving")]
    ProblemSolving,
    #[serde(rename = "Connection Request")]
    ConnectionRequest,
    Gratitude,
    #[serde(rename = "General Inquiry")]
    GeneralInquiry,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::InformationSeeking => "Information Seeking",
            Intent::ProblemSolving => "Problem Solving",
            Intent::ConnectionRequest => "Connection Request",
            Intent::Gratitude => "Gratitude",
            Intent::GeneralInquiry => "General Inquiry",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Department a message should be routed to
///
/// `GeneralInquiry` and `AccountBilling` are only produced by the
/// orchestrator's short-circuit branches, never by the department
/// classifier itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Department {
    #[serde(rename = "Solar Design")]
    SolarDesign,
    #[serde(rename = "Solar Equipment")]
    SolarEquipment,
    Permitting,
    #[serde(rename = "General Solar Inquiry")]
    GeneralSolarInquiry,
    #[serde(rename = "General Inquiry")]
    GeneralInquiry,
    #[serde(rename = "Account/Billing")]
    AccountBilling,
}

impl Department {
    pub fn as_str(&self) -> &'static str {
        match self {
            Department::SolarDesign => "Solar Design",
            Department::SolarEquipment => "Solar Equipment",
            Department::Permitting => "Permitting",
            Department::GeneralSolarInquiry => "General Solar Inquiry",
            Department::GeneralInquiry => "General Inquiry",
            Department::AccountBilling => "Account/Billing",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Combined output of the three classifiers for one message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationResult {
    pub sentiment: Sentiment,
    pub intent: Intent,
    pub department: Department,
}
