use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-user accumulated state across one or more pipeline runs.
///
/// Holds the text each stage produced, keyed by the stage's output-key.
/// Created on first contact per user, process lifetime only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    /// Unique session identifier
    pub id: String,

    /// The user this session belongs to
    pub user_id: String,

    /// Stage outputs, keyed by output-key
    pub outputs: HashMap<String, String>,

    /// When the session was created
    pub created_at: DateTime<Utc>,

    /// When the session was last updated
    pub updated_at: DateTime<Utc>,
}

impl SessionState {
    /// Create an empty session with the given id.
    pub fn new(id: impl Into<String>, user_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            user_id: user_id.into(),
            outputs: HashMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Allocate a fresh session id.
    pub fn allocate_id() -> String {
        format!("session_{}", Uuid::new_v4())
    }

    /// Record a stage output under its output-key, overwriting any prior value.
    pub fn record(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.outputs.insert(key.into(), text.into());
        self.updated_at = Utc::now();
    }

    /// Look up a recorded output by output-key.
    pub fn output(&self, key: &str) -> Option<&str> {
        self.outputs.get(key).map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_overwrites_prior_value() {
        let mut session = SessionState::new("session_1", "u1");
        session.record("code_solution", "first");
        session.record("code_solution", "second");
        assert_eq!(session.output("code_solution"), Some("second"));
    }

    #[test]
    fn allocated_ids_are_unique_and_prefixed() {
        let a = SessionState::allocate_id();
        let b = SessionState::allocate_id();
        assert_ne!(a, b);
        assert!(a.starts_with("session_"));
    }
}
