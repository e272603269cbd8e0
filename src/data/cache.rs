//! In-memory session cache
//!
//! Volatile and cleared on restart. Uses Moka so idle sessions expire on
//! their own.

use moka::future::Cache;
use moka::notification::RemovalCause;
use prometheus::IntGauge;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::metrics::SESSIONS_ACTIVE;
use crate::navigation::SessionContext;

/// Shared handle to one session's navigation state
///
/// Holding the lock for the whole request makes a session's handlers run
/// one at a time.
pub type SessionHandle = Arc<Mutex<SessionContext>>;

/// Session ID -> navigation state
pub struct SessionCache {
    sessions: Cache<String, SessionHandle>,
    active: IntGauge,
}

impl SessionCache {
    /// Create new session cache
    ///
    /// # Arguments
    /// * `idle_ttl_secs` - Drop sessions untouched for this long
    pub fn new(idle_ttl_secs: u64) -> Self {
        Self::with_gauge(Duration::from_secs(idle_ttl_secs), SESSIONS_ACTIVE.clone())
    }

    /// Create a cache that reports its size through `active`
    ///
    /// Every insert counts up and every removal counts down, whether it
    /// was a logout, an idle expiry or a replaced entry.
    pub fn with_gauge(idle_ttl: Duration, active: IntGauge) -> Self {
        let on_insert = active.clone();
        let sessions = Cache::builder()
            .time_to_idle(idle_ttl)
            .eviction_listener(move |session_id: Arc<String>, _handle, cause| {
                if cause == RemovalCause::Expired {
                    tracing::debug!(session_id = %session_id, "Session expired");
                }
                active.dec();
            })
            .build();

        Self {
            sessions,
            active: on_insert,
        }
    }

    /// Register a new session
    pub async fn insert(&self, session_id: &str, context: SessionContext) -> SessionHandle {
        let handle = Arc::new(Mutex::new(context));
        self.active.inc();
        self.sessions
            .insert(session_id.to_string(), handle.clone())
            .await;
        self.sessions.run_pending_tasks().await;
        handle
    }

    /// Get session state by ID
    pub async fn get(&self, session_id: &str) -> Option<SessionHandle> {
        self.sessions.get(session_id).await
    }

    /// Drop a session (logout)
    pub async fn remove(&self, session_id: &str) {
        self.sessions.invalidate(session_id).await;
        self.sessions.run_pending_tasks().await;
    }
}
