use thiserror::Error;

use crate::domain::email::models::Stage;
use crate::domain::email::models::UpstreamStatus;

/// Failure reported by a text-generation endpoint adapter.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{status}: {body}")]
pub struct UpstreamFailure {
    pub status: UpstreamStatus,
    pub body: String,
}

impl UpstreamFailure {
    pub fn new(status: UpstreamStatus, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Error for the two-stage generation pipeline
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerationError {
    #[error("Subject too long: maximum {max} characters, got {actual}")]
    SubjectTooLong { max: usize, actual: usize },

    #[error("Text generation failed at {stage} stage ({status}): {body}")]
    Upstream {
        stage: Stage,
        status: UpstreamStatus,
        body: String,
    },

    #[error("Generated text has no \"Subject:\" line")]
    MarkerNotFound,
}

/// Top-level error for email operations
#[derive(Debug, Clone, Error)]
pub enum EmailError {
    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
