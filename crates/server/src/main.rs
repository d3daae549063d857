//! Server entry point
//!
//! Wires configuration, tracing, metrics, the retrieval and generation
//! backends, and the session registry into the HTTP surface.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use heliodesk_agent::{
    AgentConfig, DepartmentRouter, IntentDetector, SentimentAnalyzer, SupportAgent,
};
use heliodesk_config::{load_settings, Settings};
use heliodesk_llm::{GeminiBackend, LlmConfig};
use heliodesk_rag::{KnowledgeRetriever, VectorStore, VectorStoreConfig};
use heliodesk_server::{create_router, init_metrics, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration from files and environment
    // Priority: env vars > config/{env}.toml > config/default.toml > defaults
    let env = std::env::var("HELIODESK_ENV").ok();
    let settings = match load_settings(env.as_deref()) {
        Ok(settings) => {
            // Tracing not yet initialized, use eprintln for early logging
            eprintln!(
                "Loaded configuration from files (env: {})",
                env.as_deref().unwrap_or("default")
            );
            settings
        }
        Err(e) => {
            eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
            Settings::default()
        }
    };

    init_tracing(&settings);

    tracing::info!("Starting HelioDesk server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        environment = ?settings.environment,
        config_path = env.as_deref().unwrap_or("default"),
        "Configuration loaded"
    );

    // The knowledge base is unreachable without a retrieval credential,
    // so a missing key is a startup error rather than a per-request one.
    if settings.retrieval.api_key.is_empty() {
        tracing::error!(
            "retrieval.api_key is not set. Set HELIODESK__RETRIEVAL__API_KEY or add \
             retrieval.api_key to config/default.toml."
        );
        std::process::exit(1);
    }
    if settings.generation.api_key.is_empty() {
        tracing::warn!(
            "generation.api_key is empty; generation requests will fail until \
             HELIODESK__GENERATION__API_KEY is set"
        );
    }

    let _metrics_handle = init_metrics();
    tracing::info!("Initialized Prometheus metrics at /metrics");

    let store = VectorStore::new(VectorStoreConfig {
        endpoint: settings.retrieval.endpoint.clone(),
        api_key: settings.retrieval.api_key.clone(),
        namespace: settings.retrieval.namespace.clone(),
        timeout: Duration::from_secs(settings.retrieval.timeout_seconds),
        max_retries: settings.retrieval.max_retries,
        initial_backoff: Duration::from_millis(settings.retrieval.initial_backoff_ms),
    })?;
    let retriever = Arc::new(KnowledgeRetriever::new(Arc::new(store)));
    tracing::info!(
        endpoint = %settings.retrieval.endpoint,
        namespace = %settings.retrieval.namespace,
        "Retrieval backend ready"
    );

    let llm = Arc::new(GeminiBackend::new(LlmConfig {
        model: settings.generation.model.clone(),
        endpoint: settings.generation.endpoint.clone(),
        api_key: settings.generation.api_key.clone(),
        timeout: Duration::from_secs(settings.generation.timeout_seconds),
        max_retries: settings.generation.max_retries,
        initial_backoff: Duration::from_millis(settings.generation.initial_backoff_ms),
    })?);
    tracing::info!(model = %settings.generation.model, "Generation backend ready");

    let agent = Arc::new(SupportAgent::new(
        Arc::new(SentimentAnalyzer::new()),
        Arc::new(IntentDetector::new()),
        Arc::new(DepartmentRouter::new()),
        retriever,
        llm,
        AgentConfig::from_settings(&settings),
    ));

    let state = AppState::new(settings, agent);
    let cleanup_shutdown = state.sessions.start_cleanup_task();
    let port = state.settings.server.port;

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let _ = cleanup_shutdown.send(true);
    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

/// Initialize tracing from RUST_LOG or the configured level
fn init_tracing(settings: &Settings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &settings.observability.log_level;
        format!("heliodesk={},tower_http=debug", level).into()
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);
    let fmt_layer = if settings.observability.log_json {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };
    subscriber.with(fmt_layer).init();
}
