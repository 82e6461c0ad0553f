use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{SessionState, SessionStore};

/// In-memory session store.
///
/// A lock-guarded map; contention is low and every operation is O(1).
pub struct MemoryStore {
    sessions: RwLock<HashMap<String, SessionState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn save(&self, session: &SessionState) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.id.clone(), session.clone());
        Ok(())
    }

    async fn load(&self, id: &str) -> Result<Option<SessionState>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(id).cloned())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let store = MemoryStore::new();
        let mut session = SessionState::new("session_1", "u1");
        session.record("code_explanation", "because");
        store.save(&session).await.expect("save");

        let loaded = store
            .load("session_1")
            .await
            .expect("load")
            .expect("present");
        assert_eq!(loaded.output("code_explanation"), Some("because"));
    }

    #[tokio::test]
    async fn load_missing_returns_none() {
        let store = MemoryStore::new();
        assert!(store.load("session_nope").await.expect("load").is_none());
    }
}
