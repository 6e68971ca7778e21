use thiserror::Error;

/// Failure while building the staged experience.
/// Any of these routes the sequencer to the fallback path.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("required element `{0}` not found")]
    MissingElement(String),

    #[error("collaborator setup failed: {0}")]
    Collaborator(String),

    #[error("invalid intro config: {0}")]
    Config(#[from] serde_json::Error),
}
