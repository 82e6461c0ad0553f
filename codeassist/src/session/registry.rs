use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::{SessionState, SessionStore};

/// Maps user identifiers to session identifiers and owns the backing store.
///
/// Sessions are created lazily on first contact per user. The user→session
/// map is guarded by a mutex so concurrent requests from distinct users are
/// safe; the critical sections are O(1).
pub struct SessionRegistry {
    store: Arc<dyn SessionStore>,
    sessions: Mutex<HashMap<String, String>>,
}

impl SessionRegistry {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Return the existing session id for `user_id`, allocating one if absent.
    pub async fn resolve(&self, user_id: &str) -> String {
        let mut sessions = self.sessions.lock().await;
        sessions
            .entry(user_id.to_string())
            .or_insert_with(|| {
                let id = SessionState::allocate_id();
                info!(user_id, session_id = %id, "allocated session for new user");
                id
            })
            .clone()
    }

    /// Unconditionally allocate a new session for `user_id`, overwriting any
    /// prior mapping, and initialize an empty backing record.
    pub async fn reset(&self, user_id: &str) -> Result<String> {
        let id = SessionState::allocate_id();
        {
            let mut sessions = self.sessions.lock().await;
            sessions.insert(user_id.to_string(), id.clone());
        }
        self.store.save(&SessionState::new(&id, user_id)).await?;
        info!(user_id, session_id = %id, "reset session");
        Ok(id)
    }

    /// Resolve the user's session and load its record, creating a fresh
    /// record with the resolved id when the store has none.
    ///
    /// Session absence is non-fatal and self-healing; a transient store
    /// error is treated the same way, but logged.
    pub async fn load_or_create(&self, user_id: &str) -> SessionState {
        let id = self.resolve(user_id).await;
        match self.store.load(&id).await {
            Ok(Some(session)) => session,
            Ok(None) => {
                debug!(session_id = %id, "no record for resolved session, creating fresh");
                SessionState::new(&id, user_id)
            }
            Err(e) => {
                debug!(session_id = %id, error = %e, "store lookup failed, creating fresh");
                SessionState::new(&id, user_id)
            }
        }
    }

    /// Save a session record back to the store.
    pub async fn save(&self, session: &SessionState) -> Result<()> {
        self.store.save(session).await
    }
}
