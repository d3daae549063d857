//! Conversation orchestrator
//!
//! One entry point, [`SupportAgent::answer`]: classify the message,
//! walk the short-circuit ladder, and only then pay for retrieval and
//! generation. All session-state mutation happens in short critical
//! sections on the caller's lock; the lock is never held across an
//! external call.

use std::sync::Arc;

use parking_lot::Mutex;

use heliodesk_config::{PromptTemplate, ResponseTemplates, RoutingConfig, Settings};
use heliodesk_core::{
    AgentOutcome, Answer, ClassificationResult, ConversationState, Department, DepartmentClassifier,
    Error, GenerateRequest, Intent, IntentClassifier, Result, RetrieveOptions, Retriever, Sentiment,
    SentimentClassifier,
};

use crate::escalation::{EscalationEngine, ORDER_INQUIRY_DELTA, ORDER_INQUIRY_TRIGGER};

/// Agent configuration
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Chunks requested per retrieval
    pub top_k: usize,
    /// Skip retrieval/generation for negative-sentiment messages
    ///
    /// When false the agent computes the answer and discards it before
    /// hand-off; the observable response and final session state are
    /// identical either way.
    pub handoff_on_negative: bool,
    /// Verbatim phrases answered with the CRM-connect response
    pub exact_escalation_phrases: Vec<String>,
    /// Generation sampling temperature
    pub temperature: f32,
    /// Generation nucleus cutoff
    pub top_p: f32,
    /// Generation output token cap
    pub max_output_tokens: u32,
    /// QnA prompt template
    pub prompt: PromptTemplate,
    /// Canned response texts
    pub responses: ResponseTemplates,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            handoff_on_negative: true,
            exact_escalation_phrases: RoutingConfig::default().exact_escalation_phrases,
            temperature: 0.2,
            top_p: 0.1,
            max_output_tokens: 300,
            prompt: PromptTemplate::default(),
            responses: ResponseTemplates::default(),
        }
    }
}

impl AgentConfig {
    /// Build from loaded settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            top_k: settings.retrieval.top_k,
            handoff_on_negative: settings.routing.handoff_on_negative,
            exact_escalation_phrases: settings.routing.exact_escalation_phrases.clone(),
            temperature: settings.generation.temperature,
            top_p: settings.generation.top_p,
            max_output_tokens: settings.generation.max_output_tokens,
            prompt: settings.prompt.clone(),
            responses: settings.responses.clone(),
        }
    }
}

/// Support agent
///
/// Owns trait handles only, so any classifier or backend can be
/// swapped without touching the pipeline.
pub struct SupportAgent {
    sentiment: Arc<dyn SentimentClassifier>,
    intent: Arc<dyn IntentClassifier>,
    department: Arc<dyn DepartmentClassifier>,
    retriever: Arc<dyn Retriever>,
    llm: Arc<dyn heliodesk_core::LanguageModel>,
    engine: EscalationEngine,
    config: AgentConfig,
}

impl SupportAgent {
    /// Create a new agent
    pub fn new(
        sentiment: Arc<dyn SentimentClassifier>,
        intent: Arc<dyn IntentClassifier>,
        department: Arc<dyn DepartmentClassifier>,
        retriever: Arc<dyn Retriever>,
        llm: Arc<dyn heliodesk_core::LanguageModel>,
        config: AgentConfig,
    ) -> Self {
        Self {
            sentiment,
            intent,
            department,
            retriever,
            llm,
            engine: EscalationEngine::new(),
            config,
        }
    }

    /// Answer one message within the given session state
    ///
    /// Steps: validate, classify, short-circuit ladder (CRM anger,
    /// exact phrase, order inquiry, negative hand-off), then the
    /// retrieval-generation path. Retrieval/generation failures leave
    /// the session state untouched.
    pub async fn answer(
        &self,
        question: &str,
        state: &Mutex<ConversationState>,
    ) -> Result<AgentOutcome> {
        let question = question.trim();
        if question.is_empty() {
            return Err(Error::Validation(self.config.responses.empty_question.clone()));
        }

        let classification = self.classify(question);
        let lower = question.to_lowercase();
        tracing::debug!(
            sentiment = %classification.sentiment,
            intent = %classification.intent,
            department = %classification.department,
            "Classified message"
        );

        // CRM anger: fixed hand-off answer, no state mutation
        if lower.contains("crm") && classification.sentiment.is_negative() {
            tracing::info!("CRM-anger short-circuit");
            return Ok(AgentOutcome::Answer(Answer {
                text: self.config.responses.handoff.clone(),
                intent: Intent::ConnectionRequest,
                department: Department::GeneralInquiry,
                sentiment: Sentiment::Negative,
                escalation_score: state.lock().escalation_score,
                triggers: Vec::new(),
            }));
        }

        // Exact demand phrase: fixed CRM-connect answer, no state mutation
        if self
            .config
            .exact_escalation_phrases
            .iter()
            .any(|phrase| phrase == question)
        {
            tracing::info!("Exact-phrase short-circuit");
            return Ok(AgentOutcome::Answer(Answer {
                text: self.config.responses.crm_connecting.clone(),
                intent: Intent::ProblemSolving,
                department: Department::GeneralInquiry,
                sentiment: Sentiment::Negative,
                escalation_score: state.lock().escalation_score,
                triggers: Vec::new(),
            }));
        }

        // Order inquiry: clamped score bump, fixed hand-off answer.
        // Sentiment memory is not advanced on this path.
        if lower.contains("where is my order") || lower.contains("order details") {
            let new_score = state.lock().apply_delta(ORDER_INQUIRY_DELTA);
            tracing::info!(new_score, "Order-inquiry short-circuit");
            return Ok(AgentOutcome::Answer(Answer {
                text: self.config.responses.order_handoff.clone(),
                intent: Intent::ConnectionRequest,
                department: Department::AccountBilling,
                sentiment: Sentiment::Neutral,
                escalation_score: new_score,
                triggers: vec![ORDER_INQUIRY_TRIGGER.to_string()],
            }));
        }

        // Negative sentiment ends in a hand-off either way; skipping
        // retrieval/generation saves two external calls per message.
        if self.config.handoff_on_negative && classification.sentiment.is_negative() {
            return Ok(self.hand_off(question, &classification, state));
        }

        let context = self.retrieve_context(question).await?;
        let answer_text = self.generate_answer(question, &context).await?;

        // Engine update and sentiment-memory advance share one
        // critical section so the returned score matches what this
        // message produced.
        let update = {
            let mut session = state.lock();
            let update = self.engine.update(
                question,
                classification.intent,
                classification.sentiment,
                &mut session,
            );
            session.previous_sentiment = classification.sentiment;
            update
        };

        if classification.sentiment.is_negative() {
            // Compute-then-discard path (handoff_on_negative = false):
            // the generated answer is dropped and the caller only sees
            // the hand-off message.
            let mut session = state.lock();
            session.reset_score();
            tracing::info!("Negative sentiment hand-off after generation");
            return Ok(AgentOutcome::Handoff {
                message: self.config.responses.handoff.clone(),
            });
        }

        Ok(AgentOutcome::Answer(Answer {
            text: answer_text,
            intent: classification.intent,
            department: classification.department,
            sentiment: classification.sentiment,
            escalation_score: update.new_score,
            triggers: update.triggers,
        }))
    }

    /// Run all three classifiers (pure, idempotent)
    fn classify(&self, text: &str) -> ClassificationResult {
        ClassificationResult {
            sentiment: self.sentiment.classify(text),
            intent: self.intent.classify(text),
            department: self.department.classify(text),
        }
    }

    /// Negative-sentiment hand-off without external calls
    ///
    /// The trigger table still runs so escalation signals are logged,
    /// sentiment memory advances, then the score resets to its calm
    /// state for the next human-owned conversation.
    fn hand_off(
        &self,
        question: &str,
        classification: &ClassificationResult,
        state: &Mutex<ConversationState>,
    ) -> AgentOutcome {
        let mut session = state.lock();
        let update = self.engine.update(
            question,
            classification.intent,
            classification.sentiment,
            &mut session,
        );
        session.previous_sentiment = classification.sentiment;
        session.reset_score();
        tracing::info!(
            peak_score = update.new_score,
            triggers = update.triggers.len(),
            "Negative sentiment hand-off"
        );
        AgentOutcome::Handoff {
            message: self.config.responses.handoff.clone(),
        }
    }

    /// Fetch and join the context block
    async fn retrieve_context(&self, question: &str) -> Result<String> {
        let options = RetrieveOptions::default().with_top_k(self.config.top_k);
        let chunks = self.retriever.retrieve(question, &options).await?;
        tracing::debug!(retriever = self.retriever.name(), chunks = chunks.len(), "Retrieved context");
        Ok(chunks
            .iter()
            .map(|chunk| chunk.text.as_str())
            .collect::<Vec<_>>()
            .join("\n"))
    }

    /// Generate the answer text, substituting the placeholder for
    /// empty generations
    async fn generate_answer(&self, question: &str, context: &str) -> Result<String> {
        let prompt = self.config.prompt.build(question, context);
        let request = GenerateRequest::new(prompt)
            .with_temperature(self.config.temperature)
            .with_top_p(self.config.top_p)
            .with_max_output_tokens(self.config.max_output_tokens);

        let response = self.llm.generate(request).await?;
        if response.is_empty() {
            Ok(self.config.responses.empty_generation.clone())
        } else {
            Ok(response.text.trim().to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_settings() {
        let mut settings = Settings::default();
        settings.retrieval.top_k = 5;
        settings.routing.handoff_on_negative = false;

        let config = AgentConfig::from_settings(&settings);
        assert_eq!(config.top_k, 5);
        assert!(!config.handoff_on_negative);
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.max_output_tokens, 300);
    }

    #[test]
    fn test_config_default_carries_demand_phrase() {
        let config = AgentConfig::default();
        assert_eq!(config.exact_escalation_phrases.len(), 1);
        assert!(config.exact_escalation_phrases[0].contains("CRM"));
    }
}
