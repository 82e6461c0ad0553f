use tokio::sync::mpsc;

use crate::pipeline::StageStatus;

/// Events emitted during a pipeline run.
///
/// Consumers receive these through [`RunHandle::next_event()`](crate::RunHandle::next_event).
#[derive(Debug)]
pub enum Event {
    /// A stage moved to a new status
    StageStatusChanged {
        stage_name: String,
        status: StageStatus,
    },
    /// A stage started generating
    StageStarted {
        stage_name: String,
        output_key: String,
    },
    /// A stage finished and its output was recorded
    StageCompleted {
        stage_name: String,
        output_preview: String,
    },
    /// Session state was saved to the store
    SessionSaved { session_id: String },
    /// The entire run completed
    RunCompleted { status: RunStatus },
}

/// Status of a completed run
#[derive(Debug, Clone)]
pub enum RunStatus {
    Success,
    Failed { error: String },
}

/// Sender for run events.
///
/// Wraps a `tokio::sync::mpsc::Sender<Event>` with convenience methods.
/// If constructed with `noop()`, all sends are silently dropped.
#[derive(Clone)]
pub struct EventSender {
    inner: Option<mpsc::Sender<Event>>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self {
            inner: Some(sender),
        }
    }

    /// Create a no-op sender that silently drops all events.
    pub fn noop() -> Self {
        Self { inner: None }
    }

    /// Emit an event (best-effort, drops on backpressure).
    pub fn emit(&self, event: Event) {
        if let Some(ref sender) = self.inner {
            let _ = sender.try_send(event);
        }
    }

    /// Returns true if this sender is connected (not noop).
    pub fn is_active(&self) -> bool {
        self.inner.is_some()
    }
}
