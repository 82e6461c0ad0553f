use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, info};

use crate::builder::CodeAssistBuilder;
use crate::capability::CapabilityRegistry;
use crate::error::CodeAssistError;
use crate::event::{Event, EventSender, RunStatus};
use crate::llm::LlmProvider;
use crate::pipeline::{Pipeline, execute_pipeline};
use crate::run_handle::{RunHandle, RunOutput};
use crate::session::{SessionRegistry, SessionState, SessionStore};

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Shared inner state, wrapped in Arc so spawned tasks can reference it.
struct Inner {
    provider: Box<dyn LlmProvider>,
    pipeline: Pipeline,
    capabilities: CapabilityRegistry,
    registry: SessionRegistry,
}

/// Primary entry point for the codeassist library.
///
/// Use [`CodeAssist::builder()`] to construct an instance.
///
/// # Example
///
/// ```no_run
/// # use codeassist::CodeAssist;
/// # async fn example() -> Result<(), codeassist::CodeAssistError> {
/// let assistant = CodeAssist::builder()
///     .gemini(None)?
///     .build()?;
///
/// let handle = assistant.process("default_user", "How do I parse CSV in Rust?").await?;
/// println!("{}", handle.output().await?);
/// # Ok(())
/// # }
/// ```
pub struct CodeAssist {
    inner: Arc<Inner>,
}

impl CodeAssist {
    pub(crate) fn from_parts(
        provider: Box<dyn LlmProvider>,
        pipeline: Pipeline,
        capabilities: CapabilityRegistry,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                provider,
                pipeline,
                capabilities,
                registry: SessionRegistry::new(store),
            }),
        }
    }

    /// Create a new builder for configuring a `CodeAssist` instance.
    pub fn builder() -> CodeAssistBuilder {
        CodeAssistBuilder::new()
    }

    /// Run the pipeline for a user's query and return a handle for events
    /// and the final result.
    ///
    /// The pipeline executes in a background tokio task. The user's session
    /// is resolved (created lazily on first contact) and extended with each
    /// stage's output.
    pub async fn process(&self, user_id: &str, query: &str) -> Result<RunHandle, CodeAssistError> {
        info!(
            user_id,
            stages = self.inner.pipeline.stages.len(),
            "processing query"
        );

        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let events = EventSender::new(tx);
        let inner = Arc::clone(&self.inner);
        let user_id = user_id.to_string();
        let query = query.to_string();

        let completion = tokio::spawn(async move {
            let result = execute_run(&inner, &user_id, &query, &events).await;
            match &result {
                Ok(out) => {
                    events.emit(Event::RunCompleted {
                        status: RunStatus::Success,
                    });
                    info!(session_id = %out.session_id, "run completed successfully");
                }
                Err(e) => {
                    events.emit(Event::RunCompleted {
                        status: RunStatus::Failed {
                            error: e.to_string(),
                        },
                    });
                }
            }
            // EventSender is dropped here, closing the channel
            result
        });

        Ok(RunHandle::new(rx, completion))
    }

    /// Convenience: run the pipeline and return only the final text.
    pub async fn process_to_text(
        &self,
        user_id: &str,
        query: &str,
    ) -> Result<String, CodeAssistError> {
        self.process(user_id, query).await?.output().await
    }

    /// Start a new session for the user, discarding the old mapping.
    ///
    /// Returns the new session id.
    pub async fn new_session(&self, user_id: &str) -> Result<String, CodeAssistError> {
        self.inner
            .registry
            .reset(user_id)
            .await
            .map_err(|e| CodeAssistError::Session(format!("failed to reset session: {}", e)))
    }

    /// Current session state for a user (created lazily if absent).
    pub async fn session(&self, user_id: &str) -> SessionState {
        self.inner.registry.load_or_create(user_id).await
    }
}

async fn execute_run(
    inner: &Inner,
    user_id: &str,
    query: &str,
    events: &EventSender,
) -> Result<RunOutput, CodeAssistError> {
    let mut session = inner.registry.load_or_create(user_id).await;
    let session_id = session.id.clone();

    let result = execute_pipeline(
        &inner.pipeline,
        query,
        inner.provider.as_ref(),
        &inner.capabilities,
        &mut session,
        events,
    )
    .await;

    match result {
        Ok(output) => {
            inner
                .registry
                .save(&session)
                .await
                .map_err(|e| CodeAssistError::Store(format!("failed to save session: {}", e)))?;
            events.emit(Event::SessionSaved {
                session_id: session_id.clone(),
            });
            Ok(RunOutput { output, session_id })
        }
        Err(e) => {
            // Keep whatever the completed stages recorded
            if let Err(save_err) = inner.registry.save(&session).await {
                error!(error = %save_err, "failed to save session after stage failure");
            }
            // {:#} keeps the stage context chain in the message
            Err(CodeAssistError::Pipeline(format!("{:#}", e)))
        }
    }
}
