//! Form registry error types.

use thiserror::Error;
use uuid::Uuid;

use formrelay_shared::AppError;

/// Form registry errors.
#[derive(Debug, Error)]
pub enum FormError {
    /// Form not found.
    #[error("form not found: {0}")]
    NotFound(Uuid),

    /// Caller does not own the form.
    #[error("form {0} belongs to another user")]
    Forbidden(Uuid),

    /// Required input missing.
    #[error("{0}")]
    Validation(String),

    /// Repository operation failed.
    #[error("repository error: {0}")]
    Repository(String),
}

impl FormError {
    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }
}

impl From<FormError> for AppError {
    fn from(err: FormError) -> Self {
        match err {
            FormError::NotFound(_) => Self::NotFound("Form not found".to_string()),
            FormError::Forbidden(_) => Self::Forbidden("Forbidden".to_string()),
            FormError::Validation(msg) => Self::Validation(msg),
            FormError::Repository(msg) => Self::Database(msg),
        }
    }
}
