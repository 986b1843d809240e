//! Ingest error types.

use thiserror::Error;

use crate::form::FormError;
use crate::submission::SubmissionError;
use formrelay_shared::AppError;

/// Submission intake errors.
#[derive(Debug, Error)]
pub enum IngestError {
    /// No form is registered under the key.
    #[error("no form registered for key {0}")]
    UnknownKey(String),

    /// The request body could not be read as form fields.
    #[error("malformed submission body: {0}")]
    MalformedBody(String),

    /// Form lookup failed.
    #[error(transparent)]
    Form(#[from] FormError),

    /// Persisting the submission failed.
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

impl IngestError {
    /// Create a malformed body error.
    #[must_use]
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedBody(msg.into())
    }
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::UnknownKey(_) => Self::NotFound("Form not found".to_string()),
            IngestError::MalformedBody(msg) => Self::Internal(msg),
            IngestError::Form(e) => e.into(),
            IngestError::Submission(e) => e.into(),
        }
    }
}
