#[derive(Debug, thiserror::Error)]
pub enum CodeAssistError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("provider error: {0}")]
    Provider(String),

    #[error("session error: {0}")]
    Session(String),

    #[error("pipeline error: {0}")]
    Pipeline(String),

    #[error("store error: {0}")]
    Store(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}
