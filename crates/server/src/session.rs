//! Session management
//!
//! Conversations are keyed by session id; each session owns its own
//! escalation state, so unrelated callers never see each other's
//! scores. Clients may supply their own id (adopted on first use) or
//! let the server mint a UUID.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;

use heliodesk_core::ConversationState;

use crate::ServerError;

/// One conversation's server-side state
#[derive(Debug)]
pub struct Session {
    /// Session ID
    pub id: String,
    /// Escalation state, mutated under this lock only
    state: Mutex<ConversationState>,
    /// Last activity time
    last_activity: RwLock<Instant>,
}

impl Session {
    /// Create a new session with calm initial state
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            state: Mutex::new(ConversationState::default()),
            last_activity: RwLock::new(Instant::now()),
        }
    }

    /// The per-session escalation state lock
    ///
    /// Callers take the lock for short read-modify-write sections
    /// only, never across an external call.
    pub fn state(&self) -> &Mutex<ConversationState> {
        &self.state
    }

    /// Record activity
    pub fn touch(&self) {
        *self.last_activity.write() = Instant::now();
    }

    /// Time since the last request
    pub fn idle_for(&self) -> Duration {
        self.last_activity.read().elapsed()
    }
}

/// Session registry
pub struct SessionManager {
    sessions: RwLock<HashMap<String, Arc<Session>>>,
    max_sessions: usize,
    session_timeout: Duration,
    cleanup_interval: Duration,
    max_id_length: usize,
}

impl SessionManager {
    /// Create a new session manager with default timings
    pub fn new(max_sessions: usize) -> Self {
        Self::with_config(
            max_sessions,
            Duration::from_secs(3600),
            Duration::from_secs(300),
            128,
        )
    }

    /// Create a session manager with custom timeout and cleanup interval
    pub fn with_config(
        max_sessions: usize,
        session_timeout: Duration,
        cleanup_interval: Duration,
        max_id_length: usize,
    ) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions,
            session_timeout,
            cleanup_interval,
            max_id_length,
        }
    }

    /// Start a background task that periodically removes expired sessions
    ///
    /// Returns a shutdown sender used to stop the task.
    pub fn start_cleanup_task(self: &Arc<Self>) -> watch::Sender<bool> {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let manager = Arc::clone(self);
        let interval = manager.cleanup_interval;

        tokio::spawn(async move {
            let mut interval_timer = tokio::time::interval(interval);
            interval_timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = interval_timer.tick() => {
                        let before = manager.count();
                        manager.cleanup_expired();
                        let after = manager.count();
                        if before != after {
                            tracing::info!(
                                "Session cleanup: removed {} expired sessions ({} remaining)",
                                before - after,
                                after
                            );
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            tracing::info!("Session cleanup task shutting down");
                            break;
                        }
                    }
                }
            }
        });

        shutdown_tx
    }

    /// Resolve the session for a request
    ///
    /// A known id joins its existing conversation; an unknown or
    /// absent id starts a fresh one (client-supplied ids are adopted,
    /// otherwise a UUID is minted).
    pub fn get_or_create(&self, id: Option<&str>) -> Result<Arc<Session>, ServerError> {
        if let Some(id) = id {
            if id.is_empty() || id.len() > self.max_id_length {
                return Err(ServerError::InvalidRequest(format!(
                    "session_id must be 1..={} characters",
                    self.max_id_length
                )));
            }
            if let Some(session) = self.get(id) {
                session.touch();
                return Ok(session);
            }
        }

        let id = id
            .map(str::to_string)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        self.insert(id)
    }

    /// Get a session by ID
    pub fn get(&self, id: &str) -> Option<Arc<Session>> {
        self.sessions.read().get(id).cloned()
    }

    /// Active session count
    pub fn count(&self) -> usize {
        self.sessions.read().len()
    }

    /// Remove sessions idle past the timeout
    pub fn cleanup_expired(&self) {
        let mut sessions = self.sessions.write();
        self.cleanup_expired_internal(&mut sessions);
    }

    fn insert(&self, id: String) -> Result<Arc<Session>, ServerError> {
        let mut sessions = self.sessions.write();

        // A concurrent request may have created this session between the
        // read-locked lookup and here; adopt theirs instead of replacing
        // it, or its escalation updates would land in an orphaned state.
        if let Some(session) = sessions.get(&id) {
            session.touch();
            return Ok(session.clone());
        }

        // Check capacity, reclaiming expired sessions first
        if sessions.len() >= self.max_sessions {
            self.cleanup_expired_internal(&mut sessions);
            if sessions.len() >= self.max_sessions {
                return Err(ServerError::Capacity);
            }
        }

        let session = Arc::new(Session::new(&id));
        sessions.insert(id.clone(), session.clone());
        tracing::info!("Created session: {}", id);
        Ok(session)
    }

    fn cleanup_expired_internal(&self, sessions: &mut HashMap<String, Arc<Session>>) {
        let timeout = self.session_timeout;
        sessions.retain(|id, session| {
            let keep = session.idle_for() < timeout;
            if !keep {
                tracing::debug!("Expiring idle session: {}", id);
            }
            keep
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heliodesk_core::Sentiment;

    #[test]
    fn test_fresh_session_state() {
        let session = Session::new("s-1");
        let state = session.state().lock();
        assert_eq!(state.escalation_score, 0);
        assert_eq!(state.previous_sentiment, Sentiment::Neutral);
    }

    #[test]
    fn test_get_or_create_adopts_client_id() {
        let manager = SessionManager::new(10);
        let session = manager.get_or_create(Some("conv-42")).unwrap();
        assert_eq!(session.id, "conv-42");
        assert_eq!(manager.count(), 1);

        // Same id joins the same session
        let again = manager.get_or_create(Some("conv-42")).unwrap();
        assert!(Arc::ptr_eq(&session, &again));
        assert_eq!(manager.count(), 1);
    }

    #[test]
    fn test_get_or_create_mints_uuid() {
        let manager = SessionManager::new(10);
        let a = manager.get_or_create(None).unwrap();
        let b = manager.get_or_create(None).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(manager.count(), 2);
    }

    #[test]
    fn test_rejects_oversized_id() {
        let manager = SessionManager::with_config(
            10,
            Duration::from_secs(60),
            Duration::from_secs(60),
            8,
        );
        let err = manager.get_or_create(Some("123456789")).unwrap_err();
        assert!(matches!(err, ServerError::InvalidRequest(_)));
        assert!(manager.get_or_create(Some("12345678")).is_ok());
    }

    #[test]
    fn test_capacity_limit() {
        let manager = SessionManager::new(2);
        manager.get_or_create(Some("a")).unwrap();
        manager.get_or_create(Some("b")).unwrap();
        let err = manager.get_or_create(Some("c")).unwrap_err();
        assert!(matches!(err, ServerError::Capacity));

        // Known ids still resolve at capacity
        assert!(manager.get_or_create(Some("a")).is_ok());
    }

    #[test]
    fn test_sessions_have_isolated_state() {
        let manager = SessionManager::new(10);
        let a = manager.get_or_create(Some("a")).unwrap();
        let b = manager.get_or_create(Some("b")).unwrap();

        a.state().lock().apply_delta(55);
        assert_eq!(a.state().lock().escalation_score, 55);
        assert_eq!(b.state().lock().escalation_score, 0);
    }

    #[test]
    fn test_concurrent_first_requests_share_one_session() {
        // Racing creations of the same id must all resolve to the
        // registered session, never a replaced orphan whose score
        // updates would be lost.
        let manager = Arc::new(SessionManager::new(16));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let manager = Arc::clone(&manager);
                std::thread::spawn(move || {
                    (0..500)
                        .map(|_| manager.get_or_create(Some("shared")).unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let registered = {
            let mut seen = Vec::new();
            for handle in handles {
                seen.extend(handle.join().unwrap());
            }
            seen
        };

        let canonical = manager.get("shared").unwrap();
        for session in &registered {
            assert!(Arc::ptr_eq(session, &canonical));
        }
        assert_eq!(manager.count(), 1);
    }

    #[test]
    fn test_cleanup_expired() {
        let manager = SessionManager::with_config(
            10,
            Duration::from_millis(0),
            Duration::from_secs(60),
            128,
        );
        manager.get_or_create(Some("old")).unwrap();
        manager.cleanup_expired();
        assert_eq!(manager.count(), 0);
    }
}
