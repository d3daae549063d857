//! Generation request/response types
//!
//! Shared between the `LanguageModel` trait and its backends so the
//! orchestrator never sees a vendor API shape.

/// A single generation request
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    /// Fully-built prompt text
    pub prompt: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Nucleus sampling cutoff
    pub top_p: f32,
    /// Hard cap on generated tokens
    pub max_output_tokens: u32,
}

impl GenerateRequest {
    /// Defaults follow the deterministic low-temperature answering
    /// profile: temperature 0.2, top_p 0.1, 300 output tokens.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            temperature: 0.2,
            top_p: 0.1,
            max_output_tokens: 300,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = top_p;
        self
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }
}

/// Why the backend stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    /// Natural end of the answer
    Stop,
    /// Output token cap reached
    MaxTokens,
    /// Backend safety filter intervened
    Safety,
    /// Anything the backend reports that we do not model
    Other,
}

/// A completed generation
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateResponse {
    /// Generated text, untrimmed; may be empty when the backend
    /// produced no usable candidate
    pub text: String,
    pub finish_reason: Option<FinishReason>,
}

impl GenerateResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            finish_reason: Some(FinishReason::Stop),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request = GenerateRequest::new("hello");
        assert_eq!(request.prompt, "hello");
        assert_eq!(request.temperature, 0.2);
        assert_eq!(request.top_p, 0.1);
        assert_eq!(request.max_output_tokens, 300);
    }

    #[test]
    fn test_request_builders() {
        let request = GenerateRequest::new("x")
            .with_temperature(0.7)
            .with_top_p(0.9)
            .with_max_output_tokens(64);
        assert_eq!(request.temperature, 0.7);
        assert_eq!(request.top_p, 0.9);
        assert_eq!(request.max_output_tokens, 64);
    }

    #[test]
    fn test_response_emptiness() {
        assert!(GenerateResponse::text("  \n ").is_empty());
        assert!(!GenerateResponse::text("answer").is_empty());
    }
}
