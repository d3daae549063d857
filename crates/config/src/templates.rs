//! Prompt and response templates
//!
//! The fixed strings the pipeline serves: hand-off messages, the
//! "Connecting to CRM" answer, the empty-generation placeholder, the
//! apology body, and the QnA generation prompt. Defaults here are the
//! production texts; deployments can override any of them through the
//! configuration layers.

use serde::{Deserialize, Serialize};

/// QnA generation prompt template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptTemplate {
    /// Role instructions prepended to every prompt
    pub role: String,
    /// Closing instruction appended after the context block
    pub closing: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            role: "You are an AI assistant specializing in customer QnA. Use the provided \
                   context to answer the question. If the context does not contain the answer, \
                   use your own knowledge to provide a response."
                .to_string(),
            closing: "Answer concisely and factually. If the answer is not in the context, \
                      use your own knowledge to provide a response."
                .to_string(),
        }
    }
}

impl PromptTemplate {
    /// Build the full generation prompt
    ///
    /// `context` is the newline-joined retrieved chunks; it may be
    /// empty, in which case the generator falls back to general
    /// knowledge per the closing instruction.
    pub fn build(&self, question: &str, context: &str) -> String {
        format!(
            "{}\n\n**Question:** {}\n\n**Context (Use this if available):**\n{}\n\n**{}**\n",
            self.role, question, context, self.closing
        )
    }
}

/// Canned response texts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseTemplates {
    /// Human hand-off message (negative sentiment, CRM-anger)
    pub handoff: String,
    /// Order-inquiry hand-off message
    pub order_handoff: String,
    /// Exact-phrase escalation answer
    pub crm_connecting: String,
    /// Substituted when the generator returns empty text
    pub empty_generation: String,
    /// Generic apology masking internal failures
    pub apology: String,
    /// Validation message for an empty question
    pub empty_question: String,
}

impl Default for ResponseTemplates {
    fn default() -> Self {
        Self {
            handoff: "Sorry for the inconvenience. Let me connect you with our customer \
                      support team for further assistance!"
                .to_string(),
            order_handoff: "Sorry, but I can't track orders at the moment. Let me connect \
                            you with our customer support team for assistance!"
                .to_string(),
            crm_connecting: "Connecting to CRM".to_string(),
            empty_generation: "⚠️ No relevant data found.".to_string(),
            apology: "An error occurred while processing your request. Please try again."
                .to_string(),
            empty_question: "Question cannot be empty.".to_string(),
        }
    }
}
