use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::CodeAssistError;
use crate::event::Event;

/// Result of a finished pipeline run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// Text produced by the last stage, or the fallback message when every
    /// stage came back empty
    pub output: String,
    /// Session the stage outputs were recorded into
    pub session_id: String,
}

/// Observer for an in-flight pipeline run.
///
/// The stages execute in a background task; the handle exposes their
/// lifecycle as [`Event`]s and resolves to a [`RunOutput`] once the last
/// stage has finished.
///
/// # Example
///
/// ```no_run
/// # use codeassist::{CodeAssistError, Event, RunHandle, RunOutput};
/// # async fn watch(mut handle: RunHandle) -> Result<RunOutput, CodeAssistError> {
/// while let Some(event) = handle.next_event().await {
///     if let Event::StageCompleted { stage_name, .. } = event {
///         println!("{stage_name} done");
///     }
/// }
/// handle.wait().await
/// # }
/// ```
pub struct RunHandle {
    events: mpsc::Receiver<Event>,
    completion: JoinHandle<Result<RunOutput, CodeAssistError>>,
}

impl RunHandle {
    pub(crate) fn new(
        events: mpsc::Receiver<Event>,
        completion: JoinHandle<Result<RunOutput, CodeAssistError>>,
    ) -> Self {
        Self { events, completion }
    }

    /// Next stage lifecycle event, or `None` once the run has finished and
    /// the channel is closed.
    pub async fn next_event(&mut self) -> Option<Event> {
        self.events.recv().await
    }

    /// Wait for the background task and return the run's result.
    pub async fn wait(self) -> Result<RunOutput, CodeAssistError> {
        self.completion
            .await
            .map_err(|e| CodeAssistError::Internal(anyhow::anyhow!("run task panicked: {}", e)))?
    }

    /// Final text only, discarding the stage lifecycle.
    ///
    /// The event channel is bounded, so the events are consumed here rather
    /// than left to fill up behind a caller that never reads them.
    pub async fn output(mut self) -> Result<String, CodeAssistError> {
        while self.next_event().await.is_some() {}
        Ok(self.wait().await?.output)
    }
}
