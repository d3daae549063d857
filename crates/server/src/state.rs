//! Shared application state

use std::sync::Arc;
use std::time::Duration;

use heliodesk_agent::SupportAgent;
use heliodesk_config::Settings;

use crate::session::SessionManager;

/// State shared by all request handlers
#[derive(Clone)]
pub struct AppState {
    /// Loaded settings
    pub settings: Arc<Settings>,
    /// Session registry
    pub sessions: Arc<SessionManager>,
    /// Conversation orchestrator
    pub agent: Arc<SupportAgent>,
}

impl AppState {
    /// Create application state from loaded settings
    pub fn new(settings: Settings, agent: Arc<SupportAgent>) -> Self {
        let sessions = Arc::new(SessionManager::with_config(
            settings.sessions.max_sessions,
            Duration::from_secs(settings.sessions.idle_timeout_seconds),
            Duration::from_secs(settings.sessions.cleanup_interval_seconds),
            settings.sessions.max_id_length,
        ));

        Self {
            settings: Arc::new(settings),
            sessions,
            agent,
        }
    }
}
