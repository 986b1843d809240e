//! Submission error types.

use thiserror::Error;
use uuid::Uuid;

use crate::form::FormError;
use formrelay_shared::AppError;

/// Submission operation errors.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// Submission not found.
    #[error("submission not found: {0}")]
    NotFound(Uuid),

    /// Parent form lookup failed.
    #[error(transparent)]
    Form(#[from] FormError),

    /// Caller does not own the parent form.
    #[error("submission {0} belongs to another user's form")]
    Forbidden(Uuid),

    /// Repository operation failed.
    #[error("repository error: {0}")]
    Repository(String),
}

impl SubmissionError {
    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }
}

impl From<SubmissionError> for AppError {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::NotFound(_) => Self::NotFound("Submission not found".to_string()),
            SubmissionError::Form(e) => e.into(),
            SubmissionError::Forbidden(_) => Self::Forbidden("Forbidden".to_string()),
            SubmissionError::Repository(msg) => Self::Database(msg),
        }
    }
}
