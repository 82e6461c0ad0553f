mod runner;
mod stage;

pub use runner::{FALLBACK_MESSAGE, StageStatus, execute_pipeline};
pub use stage::{Pipeline, PromptBuilder, Stage, StageContext};
