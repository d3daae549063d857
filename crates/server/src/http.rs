//! HTTP Endpoints
//!
//! REST API for the support agent. The `/ask` wire shape is fixed:
//! full answers carry the upper-case classification keys and the
//! `"N/100"` score rendering; hand-offs carry only `answer` and
//! `session_id`.

use std::time::Instant;

use axum::{
    extract::{Json, State},
    http::{HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use heliodesk_core::{AgentOutcome, Error};

use crate::metrics::{
    metrics_handler, record_error, record_handoff, record_request, record_request_latency,
    record_score,
};
use crate::state::AppState;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let cors_layer = build_cors_layer(
        &state.settings.server.cors_origins,
        state.settings.server.cors_enabled,
    );

    Router::new()
        .route("/ask", post(ask))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors_layer)
        .with_state(state)
}

/// Build CORS layer from configured origins
///
/// - If cors_enabled is false, returns permissive layer (for dev)
/// - If cors_origins is empty, defaults to localhost:3000 for safety
/// - Otherwise, uses the configured origins
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        tracing::warn!("CORS is disabled - allowing all origins (NOT FOR PRODUCTION)");
        return CorsLayer::permissive();
    }

    if origins.is_empty() {
        tracing::info!("No CORS origins configured, defaulting to localhost:3000");
        return localhost_cors();
    }

    let parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    if parsed_origins.is_empty() {
        tracing::error!("All configured CORS origins are invalid, falling back to localhost");
        return localhost_cors();
    }

    tracing::info!("CORS configured with {} origins", parsed_origins.len());
    CorsLayer::new()
        .allow_origin(parsed_origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

fn localhost_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin("http://localhost:3000".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

/// Ask request
#[derive(Debug, Deserialize)]
struct AskRequest {
    /// The user's message; missing is treated as empty
    #[serde(default)]
    question: String,
    /// Conversation to continue; absent starts a new one
    #[serde(default)]
    session_id: Option<String>,
}

/// Ask endpoint
///
/// Backend failures after a session exists answer 200 with an error
/// body so the frontend can render them inline; only input problems
/// and capacity answer non-200.
async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> impl IntoResponse {
    let started = Instant::now();

    // Validate before touching the session registry so an empty
    // question never creates a session.
    let question = request.question.trim();
    if question.is_empty() {
        record_request("rejected");
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": state.settings.responses.empty_question })),
        );
    }

    let session = match state.sessions.get_or_create(request.session_id.as_deref()) {
        Ok(session) => session,
        Err(err) => {
            record_request("rejected");
            tracing::warn!(error = %err, "Session resolution failed");
            let message = err.to_string();
            return (StatusCode::from(err), Json(json!({ "error": message })));
        }
    };
    session.touch();

    let result = state.agent.answer(question, session.state()).await;
    record_request_latency(started.elapsed());

    match result {
        Ok(AgentOutcome::Answer(answer)) => {
            record_request("answer");
            record_score(answer.escalation_score);
            (
                StatusCode::OK,
                Json(json!({
                    "answer": answer.text,
                    "INTENT": answer.intent.as_str(),
                    "DEPARTMENT": answer.department.as_str(),
                    "SENTIMENT": answer.sentiment.as_str(),
                    "ESCALATION_SCORE": format!("{}/100", answer.escalation_score),
                    "ESCALATION_TRIGGERS": answer.triggers,
                    "session_id": session.id,
                })),
            )
        }
        Ok(AgentOutcome::Handoff { message }) => {
            record_request("handoff");
            record_handoff("negative_sentiment");
            (
                StatusCode::OK,
                Json(json!({
                    "answer": message,
                    "session_id": session.id,
                })),
            )
        }
        Err(Error::Validation(message)) => {
            record_request("rejected");
            (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
        }
        Err(Error::Retrieval(detail)) => {
            record_request("error");
            record_error("retrieval");
            tracing::error!(detail = %detail, "Retrieval failed");
            (
                StatusCode::OK,
                Json(json!({
                    "error": format!("Retrieval error: {detail}"),
                    "session_id": session.id,
                })),
            )
        }
        Err(Error::Generation(detail)) => {
            record_request("error");
            record_error("generation");
            tracing::error!(detail = %detail, "Generation failed");
            (
                StatusCode::OK,
                Json(json!({
                    "error": format!("Generation error: {detail}"),
                    "session_id": session.id,
                })),
            )
        }
        Err(err) => {
            record_request("error");
            record_error(err.kind());
            tracing::error!(error = %err, "Request failed");
            (
                StatusCode::OK,
                Json(json!({
                    "answer": state.settings.responses.apology,
                    "session_id": session.id,
                })),
            )
        }
    }
}

/// Health check
async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Readiness check
async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ready",
        "sessions": state.sessions.count(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use heliodesk_agent::{
        AgentConfig, DepartmentRouter, IntentDetector, SentimentAnalyzer, SupportAgent,
    };
    use heliodesk_config::Settings;
    use heliodesk_core::{
        GenerateRequest, GenerateResponse, LanguageModel, Result, RetrieveOptions, RetrievedChunk,
        Retriever,
    };

    struct EmptyRetriever;

    #[async_trait]
    impl Retriever for EmptyRetriever {
        async fn retrieve(
            &self,
            _query: &str,
            _options: &RetrieveOptions,
        ) -> Result<Vec<RetrievedChunk>> {
            Ok(Vec::new())
        }

        fn name(&self) -> &str {
            "empty"
        }
    }

    struct FixedLlm;

    #[async_trait]
    impl LanguageModel for FixedLlm {
        async fn generate(&self, _request: GenerateRequest) -> Result<GenerateResponse> {
            Ok(GenerateResponse::text("Solar panels convert sunlight."))
        }

        async fn is_available(&self) -> bool {
            true
        }

        fn model_name(&self) -> &str {
            "fixed"
        }
    }

    struct NoCandidateLlm;

    #[async_trait]
    impl LanguageModel for NoCandidateLlm {
        async fn generate(&self, _request: GenerateRequest) -> Result<GenerateResponse> {
            Err(heliodesk_core::Error::IncompleteResult(
                "generation response contained no candidates".to_string(),
            ))
        }

        async fn is_available(&self) -> bool {
            false
        }

        fn model_name(&self) -> &str {
            "no-candidate"
        }
    }

    fn state_with_llm(llm: Arc<dyn LanguageModel>) -> AppState {
        let settings = Settings::default();
        let agent = SupportAgent::new(
            Arc::new(SentimentAnalyzer::new()),
            Arc::new(IntentDetector::new()),
            Arc::new(DepartmentRouter::new()),
            Arc::new(EmptyRetriever),
            llm,
            AgentConfig::from_settings(&settings),
        );
        AppState::new(settings, Arc::new(agent))
    }

    fn test_state() -> AppState {
        state_with_llm(Arc::new(FixedLlm))
    }

    #[tokio::test]
    async fn test_router_creation() {
        let _ = create_router(test_state());
    }

    #[tokio::test]
    async fn test_ask_answer_wire_shape() {
        let state = test_state();
        let request = AskRequest {
            question: "How do solar panels work?".to_string(),
            session_id: None,
        };

        let response = ask(State(state), Json(request)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["answer"], "Solar panels convert sunlight.");
        assert_eq!(body["SENTIMENT"], "Neutral");
        assert_eq!(body["ESCALATION_SCORE"], "0/100");
        assert!(body["ESCALATION_TRIGGERS"].as_array().unwrap().is_empty());
        assert!(body["session_id"].as_str().unwrap().len() > 0);
    }

    #[tokio::test]
    async fn test_ask_empty_question_rejected() {
        let state = test_state();
        let sessions = state.sessions.clone();
        let request = AskRequest {
            question: "   ".to_string(),
            session_id: None,
        };

        let response = ask(State(state), Json(request)).await.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        // Rejected requests never create a session
        assert_eq!(sessions.count(), 0);
    }

    #[tokio::test]
    async fn test_incomplete_result_masked_by_apology() {
        let state = state_with_llm(Arc::new(NoCandidateLlm));
        let apology = state.settings.responses.apology.clone();
        let request = AskRequest {
            question: "How do solar panels work?".to_string(),
            session_id: Some("s-1".to_string()),
        };

        let response = ask(State(state), Json(request)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["answer"], apology);
        assert_eq!(body["session_id"], "s-1");
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn test_ask_handoff_wire_shape() {
        let state = test_state();
        let request = AskRequest {
            question: "This is terrible, nothing works and I am furious".to_string(),
            session_id: Some("angry-1".to_string()),
        };

        let response = ask(State(state), Json(request)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert!(body["answer"]
            .as_str()
            .unwrap()
            .contains("customer support team"));
        assert_eq!(body["session_id"], "angry-1");
        assert!(body.get("INTENT").is_none());
    }
}
