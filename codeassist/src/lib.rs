mod assistant;
pub mod builder;
pub mod capability;
pub mod config;
pub mod error;
pub mod event;
pub mod llm;
pub mod pipeline;
pub mod run_handle;
pub mod session;

pub use assistant::CodeAssist;
pub use builder::CodeAssistBuilder;
pub use capability::{Capability, CapabilityRegistry, WebSearchCapability};
pub use config::AppConfig;
pub use error::CodeAssistError;
pub use event::{Event, EventSender, RunStatus};
pub use llm::{AnthropicProvider, GeminiProvider, LlmProvider};
pub use pipeline::{
    FALLBACK_MESSAGE, Pipeline, PromptBuilder, Stage, StageContext, StageStatus, execute_pipeline,
};
pub use run_handle::{RunHandle, RunOutput};
pub use session::{MemoryStore, SessionRegistry, SessionState, SessionStore};
