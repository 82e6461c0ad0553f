use anyhow::Result;
use async_trait::async_trait;

use super::SessionState;

/// Storage backend for sessions.
///
/// Injectable at the application root; the shipped backend is in-memory
/// ([`MemoryStore`](super::MemoryStore)). All state is lost on restart.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Save a session
    async fn save(&self, session: &SessionState) -> Result<()>;

    /// Load a session by ID
    async fn load(&self, id: &str) -> Result<Option<SessionState>>;

    /// Delete a session
    async fn delete(&self, id: &str) -> Result<()>;
}
