//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::templates::{PromptTemplate, ResponseTemplates};
use crate::ConfigError;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Development mode - relaxed validation, warnings only
    #[default]
    Development,
    /// Staging mode - stricter validation
    Staging,
    /// Production mode - all validations enforced
    Production,
}

impl RuntimeEnvironment {
    /// Check if this is a production environment
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Session registry configuration
    #[serde(default)]
    pub sessions: SessionConfig,

    /// Vector-search backend configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Text-generation backend configuration
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Escalation routing policy
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Generation prompt template
    #[serde(default)]
    pub prompt: PromptTemplate,

    /// Canned response texts
    #[serde(default)]
    pub responses: ResponseTemplates,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Enable CORS origin checks (false allows all origins)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,
    /// Allowed CORS origins (empty = localhost fallback)
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_port() -> u16 {
    // The reference frontend posts to http://127.0.0.1:5000/ask
    5000
}

fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            cors_enabled: default_true(),
            cors_origins: Vec::new(),
        }
    }
}

/// Session registry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Maximum concurrent sessions
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
    /// Idle seconds before a session expires
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,
    /// Seconds between cleanup sweeps
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_seconds: u64,
    /// Longest accepted client-supplied session id
    #[serde(default = "default_max_id_length")]
    pub max_id_length: usize,
}

fn default_max_sessions() -> usize {
    1000
}

fn default_idle_timeout() -> u64 {
    3600
}

fn default_cleanup_interval() -> u64 {
    300
}

fn default_max_id_length() -> usize {
    128
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_sessions: default_max_sessions(),
            idle_timeout_seconds: default_idle_timeout(),
            cleanup_interval_seconds: default_cleanup_interval(),
            max_id_length: default_max_id_length(),
        }
    }
}

/// Vector-search backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Backend base URL
    #[serde(default = "default_retrieval_endpoint")]
    pub endpoint: String,
    /// API credential (required at startup)
    #[serde(default)]
    pub api_key: String,
    /// Knowledge namespace to search
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Chunks per query
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Request timeout in seconds
    #[serde(default = "default_retrieval_timeout")]
    pub timeout_seconds: u64,
    /// Retry attempts for transient failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Initial retry backoff in milliseconds (doubles each attempt)
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
}

fn default_retrieval_endpoint() -> String {
    "https://demo.svc.pinecone.io".to_string()
}

fn default_namespace() -> String {
    "solar-knowledge".to_string()
}

fn default_top_k() -> usize {
    3
}

fn default_retrieval_timeout() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    2
}

fn default_initial_backoff_ms() -> u64 {
    200
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            endpoint: default_retrieval_endpoint(),
            api_key: String::new(),
            namespace: default_namespace(),
            top_k: default_top_k(),
            timeout_seconds: default_retrieval_timeout(),
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
        }
    }
}

/// Text-generation backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Backend base URL
    #[serde(default = "default_generation_endpoint")]
    pub endpoint: String,
    /// API credential (optional; startup warns when empty)
    #[serde(default)]
    pub api_key: String,
    /// Model name
    #[serde(default = "default_model")]
    pub model: String,
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Nucleus sampling cutoff
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    /// Hard cap on generated tokens
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    /// Request timeout in seconds
    #[serde(default = "default_generation_timeout")]
    pub timeout_seconds: u64,
    /// Retry attempts for transient failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Initial retry backoff in milliseconds (doubles each attempt)
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
}

fn default_generation_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_model() -> String {
    "gemini-1.5-pro".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_top_p() -> f32 {
    0.1
}

fn default_max_output_tokens() -> u32 {
    300
}

fn default_generation_timeout() -> u64 {
    30
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: default_generation_endpoint(),
            api_key: String::new(),
            model: default_model(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            max_output_tokens: default_max_output_tokens(),
            timeout_seconds: default_generation_timeout(),
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
        }
    }
}

/// Escalation routing policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Skip retrieval/generation when sentiment is negative
    ///
    /// When false, the pipeline still computes an answer and discards
    /// it before hand-off. The observable response is identical either
    /// way; true avoids the wasted external calls.
    #[serde(default = "default_true")]
    pub handoff_on_negative: bool,
    /// Verbatim phrases that trigger the "Connecting to CRM" answer
    #[serde(default = "default_escalation_phrases")]
    pub exact_escalation_phrases: Vec<String>,
}

fn default_escalation_phrases() -> Vec<String> {
    vec![
        "Listen up, bot! No more excuses. I need you to immediately integrate with the CRM \
         system. That means syncing customer interactions, updating records in real-time, and \
         ensuring seamless data flow between the chatbot and the CRM. If a conversation needs \
         escalation, it better be flagged and routed to the right team instantly. I don\u{2019}t \
         want delays, I don\u{2019}t want errors\u{2014}just execute the integration flawlessly, \
         now"
            .to_string(),
    ]
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            handoff_on_negative: default_true(),
            exact_escalation_phrases: default_escalation_phrases(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Emit JSON log lines instead of plain text
    #[serde(default)]
    pub log_json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_sessions()?;
        self.validate_retrieval()?;
        self.validate_generation()?;
        self.validate_routing()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                message: "Port must be non-zero".to_string(),
            });
        }

        if self.environment.is_production() && self.server.cors_enabled && self.server.cors_origins.is_empty()
        {
            tracing::warn!(
                "CORS is enabled in production but no origins are configured. \
                 Falling back to localhost may block legitimate requests."
            );
        }

        Ok(())
    }

    fn validate_sessions(&self) -> Result<(), ConfigError> {
        if self.sessions.max_sessions == 0 {
            return Err(ConfigError::InvalidValue {
                field: "sessions.max_sessions".to_string(),
                message: "Must allow at least one session".to_string(),
            });
        }

        if self.sessions.cleanup_interval_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "sessions.cleanup_interval_seconds".to_string(),
                message: "Cleanup interval must be at least 1 second".to_string(),
            });
        }

        Ok(())
    }

    fn validate_retrieval(&self) -> Result<(), ConfigError> {
        if self.retrieval.top_k == 0 || self.retrieval.top_k > 20 {
            return Err(ConfigError::InvalidValue {
                field: "retrieval.top_k".to_string(),
                message: format!("Must be between 1 and 20, got {}", self.retrieval.top_k),
            });
        }

        if self.retrieval.namespace.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "retrieval.namespace".to_string(),
                message: "Namespace must not be empty".to_string(),
            });
        }

        if self.retrieval.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retrieval.timeout_seconds".to_string(),
                message: "Timeout must be at least 1 second".to_string(),
            });
        }

        Ok(())
    }

    fn validate_generation(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.generation.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "generation.temperature".to_string(),
                message: format!(
                    "Must be between 0.0 and 2.0, got {}",
                    self.generation.temperature
                ),
            });
        }

        if !(0.0..=1.0).contains(&self.generation.top_p) {
            return Err(ConfigError::InvalidValue {
                field: "generation.top_p".to_string(),
                message: format!("Must be between 0.0 and 1.0, got {}", self.generation.top_p),
            });
        }

        if self.generation.max_output_tokens == 0 {
            return Err(ConfigError::InvalidValue {
                field: "generation.max_output_tokens".to_string(),
                message: "Must generate at least one token".to_string(),
            });
        }

        if self.generation.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "generation.timeout_seconds".to_string(),
                message: "Timeout must be at least 1 second".to_string(),
            });
        }

        Ok(())
    }

    fn validate_routing(&self) -> Result<(), ConfigError> {
        for (i, phrase) in self.routing.exact_escalation_phrases.iter().enumerate() {
            if phrase.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: format!("routing.exact_escalation_phrases[{}]", i),
                    message: "Escalation phrase must not be blank".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Load settings from files and environment
///
/// Priority (highest to lowest):
/// 1. Environment variables (HELIODESK prefix, `__` separator)
/// 2. config/{env}.toml (if env specified)
/// 3. config/default.toml
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    // Load default config
    builder = builder.add_source(File::with_name("config/default").required(false));

    // Load environment-specific config
    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    // Load from environment variables
    builder = builder.add_source(
        Environment::with_prefix("HELIODESK")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    // Validate
    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 5000);
        assert_eq!(settings.retrieval.namespace, "solar-knowledge");
        assert_eq!(settings.retrieval.top_k, 3);
        assert_eq!(settings.generation.model, "gemini-1.5-pro");
        assert!(settings.routing.handoff_on_negative);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_generation_defaults_match_answering_profile() {
        let generation = GenerationConfig::default();
        assert_eq!(generation.temperature, 0.2);
        assert_eq!(generation.top_p, 0.1);
        assert_eq!(generation.max_output_tokens, 300);
    }

    #[test]
    fn test_validation_rejects_bad_top_k() {
        let mut settings = Settings::default();
        settings.retrieval.top_k = 0;
        assert!(settings.validate().is_err());

        settings.retrieval.top_k = 21;
        assert!(settings.validate().is_err());

        settings.retrieval.top_k = 3;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_sampling() {
        let mut settings = Settings::default();
        settings.generation.top_p = 1.5;
        assert!(settings.validate().is_err());

        settings.generation.top_p = 0.1;
        settings.generation.temperature = -0.1;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_blank_phrase() {
        let mut settings = Settings::default();
        settings.routing.exact_escalation_phrases.push("   ".to_string());
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_default_escalation_phrase_is_verbatim() {
        let phrases = RoutingConfig::default().exact_escalation_phrases;
        assert_eq!(phrases.len(), 1);
        assert!(phrases[0].starts_with("Listen up, bot!"));
        assert!(phrases[0].ends_with("flawlessly, now"));
    }
}
