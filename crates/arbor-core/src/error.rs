//! Error types for Arbor Core.

use thiserror::Error;

/// Result type alias for Arbor operations.
pub type Result<T> = std::result::Result<T, ArborError>;

/// Errors that can occur in Arbor operations.
///
/// Configuration errors are raised while building an engine, before any
/// collaborator is called. Collaborator errors come out of an expander,
/// scorer or feedback callback and are handed back to the caller of
/// `search`/`solve` exactly as they were produced.
#[derive(Error, Debug)]
pub enum ArborError {
    /// A configuration value is out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A required collaborator was never supplied.
    #[error("missing collaborator: {0}")]
    MissingCollaborator(&'static str),

    /// Invalid candidate reference.
    #[error("invalid candidate id: {0}")]
    InvalidCandidate(usize),

    /// Expander failure.
    #[error("expansion failed: {0}")]
    Expansion(String),

    /// Scorer failure.
    #[error("scoring failed: {0}")]
    Scoring(String),

    /// Feedback scorer failure.
    #[error("feedback failed: {0}")]
    Feedback(String),

    /// Any other collaborator failure.
    #[error(transparent)]
    Collaborator(#[from] anyhow::Error),

    /// I/O error.
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl ArborError {
    /// True for errors raised while constructing or configuring an engine.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig(_)
                | Self::MissingCollaborator(_)
                | Self::IoError(_)
                | Self::SerdeError(_)
        )
    }

    /// True for errors produced by an expander, scorer or feedback callback.
    pub fn is_collaborator(&self) -> bool {
        matches!(
            self,
            Self::Expansion(_) | Self::Scoring(_) | Self::Feedback(_) | Self::Collaborator(_)
        )
    }
}
