use anyhow::{Context, Result};
use tracing::info;

use crate::capability::CapabilityRegistry;
use crate::event::{Event, EventSender};
use crate::llm::LlmProvider;
use crate::pipeline::{Pipeline, Stage, StageContext};
use crate::session::SessionState;

/// Returned in place of an empty final output. Default-on-empty policy,
/// not an error path.
pub const FALLBACK_MESSAGE: &str =
    "I encountered an issue processing your request. Please try again or start a new session.";

/// Execution status of a single stage within a run.
///
/// No failed state: a failure inside a stage aborts the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageStatus {
    Pending,
    Running,
    Done,
}

impl std::fmt::Display for StageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Running => write!(f, "running"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// Execute a pipeline against a session with the given provider.
///
/// Runs the stage list exactly once, in order, never skipping or repeating
/// a stage. Each stage's output is recorded under its output-key in both
/// the per-run context and the session, so stage *k* sees the outputs of
/// stages 1..*k*-1 (plus whatever a reused session already held).
///
/// Returns the last stage's output, or [`FALLBACK_MESSAGE`] if the chain
/// produced no final text. Stage failures are not caught or retried here;
/// they propagate to the caller.
pub async fn execute_pipeline(
    pipeline: &Pipeline,
    query: &str,
    provider: &dyn LlmProvider,
    capabilities: &CapabilityRegistry,
    session: &mut SessionState,
    events: &EventSender,
) -> Result<String> {
    info!(query, stages = pipeline.stages.len(), "pipeline starting");

    let mut context = StageContext::with_outputs(query, session.outputs.clone());
    let mut final_output = String::new();

    for stage in &pipeline.stages {
        let output = execute_stage(stage, &context, provider, capabilities, events).await?;
        session.record(&stage.output_key, &output);
        context.record(&stage.output_key, output.clone());
        final_output = output;
    }

    if final_output.is_empty() {
        info!("final stage produced no text, substituting fallback message");
        return Ok(FALLBACK_MESSAGE.to_string());
    }

    Ok(final_output)
}

async fn execute_stage(
    stage: &Stage,
    context: &StageContext,
    provider: &dyn LlmProvider,
    capabilities: &CapabilityRegistry,
    events: &EventSender,
) -> Result<String> {
    info!(stage = %stage.name, "=== STAGE: {} ===", stage.name);

    events.emit(Event::StageStatusChanged {
        stage_name: stage.name.clone(),
        status: StageStatus::Running,
    });
    events.emit(Event::StageStarted {
        stage_name: stage.name.clone(),
        output_key: stage.output_key.clone(),
    });

    let prompt = stage.prompt_builder.build_prompt(context);
    let stage_capabilities = capabilities.resolve(&stage.capabilities);

    let output = provider
        .generate(&stage.instruction, &prompt, &stage_capabilities)
        .await
        .with_context(|| format!("{} stage: generation failed", stage.name))?;

    info!(stage = %stage.name, output_len = output.len(), "stage completed");

    events.emit(Event::StageStatusChanged {
        stage_name: stage.name.clone(),
        status: StageStatus::Done,
    });
    events.emit(Event::StageCompleted {
        stage_name: stage.name.clone(),
        output_preview: truncate(&output, 200),
    });

    Ok(output)
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        s.chars().take(max_chars).collect::<String>() + "..."
    }
}
