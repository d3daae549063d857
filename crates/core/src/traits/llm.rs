//! Language model trait

use async_trait::async_trait;

use crate::{GenerateRequest, GenerateResponse, Result};

/// Text-generation interface
///
/// Implementations:
/// - `GeminiBackend` - Google Gemini `generateContent` API
///
/// # Example
///
/// ```ignore
/// let llm: Arc<dyn LanguageModel> = Arc::new(GeminiBackend::new(config)?);
/// let request = GenerateRequest::new("Answer the question: ...");
/// let response = llm.generate(request).await?;
/// println!("{}", response.text);
/// ```
#[async_trait]
pub trait LanguageModel: Send + Sync + 'static {
    /// Generate a completion for the given prompt
    ///
    /// Failures map to [`Error::Generation`](crate::Error::Generation)
    /// at the orchestrator boundary.
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse>;

    /// Check if the backend is reachable
    ///
    /// Returns false when the service is down or misconfigured.
    async fn is_available(&self) -> bool;

    /// Model name for logging
    fn model_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockLlm;

    #[async_trait]
    impl LanguageModel for MockLlm {
        async fn generate(&self, _request: GenerateRequest) -> Result<GenerateResponse> {
            Ok(GenerateResponse::text("Mock response"))
        }

        async fn is_available(&self) -> bool {
            true
        }

        fn model_name(&self) -> &str {
            "mock-llm"
        }
    }

    #[tokio::test]
    async fn test_mock_llm() {
        let llm = MockLlm;
        assert!(llm.is_available().await);
        assert_eq!(llm.model_name(), "mock-llm");

        let response = llm.generate(GenerateRequest::new("Test")).await.unwrap();
        assert_eq!(response.text, "Mock response");
    }

    #[tokio::test]
    async fn test_object_safety() {
        let llm: Box<dyn LanguageModel> = Box::new(MockLlm);
        let response = llm.generate(GenerateRequest::new("Test")).await.unwrap();
        assert!(!response.is_empty());
    }
}
