//! Submission viewer service implementation.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use super::csv::export_csv;
use super::error::SubmissionError;
use super::types::{NewSubmission, Submission};
use crate::form::{FormRepository, find_owned};

/// Repository trait for submission persistence.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait SubmissionRepository: Send + Sync {
    /// Persist a new submission.
    fn create(
        &self,
        input: NewSubmission,
    ) -> impl std::future::Future<Output = Result<Submission, SubmissionError>> + Send;

    /// Find submission by ID.
    fn find_by_id(
        &self,
        id: Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Submission>, SubmissionError>> + Send;

    /// List a form's submissions, newest first.
    fn list_by_form(
        &self,
        form_id: Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<Submission>, SubmissionError>> + Send;

    /// Delete a submission.
    fn delete(
        &self,
        id: Uuid,
    ) -> impl std::future::Future<Output = Result<bool, SubmissionError>> + Send;
}

/// A form's name and its submissions.
#[derive(Debug, Clone, Serialize)]
pub struct FormSubmissions {
    /// Form display name. The dashboard reads this one field as `formName`.
    #[serde(rename = "formName")]
    pub form_name: String,
    /// Submissions, newest first.
    pub submissions: Vec<Submission>,
}

/// Owner-scoped access to stored submissions.
pub struct SubmissionService<F: FormRepository, S: SubmissionRepository> {
    forms: Arc<F>,
    submissions: Arc<S>,
}

impl<F: FormRepository, S: SubmissionRepository> SubmissionService<F, S> {
    /// Create a new submission service.
    #[must_use]
    pub fn new(forms: Arc<F>, submissions: Arc<S>) -> Self {
        Self { forms, submissions }
    }

    /// All submissions of a form owned by `owner_id`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `FormError::NotFound` / `FormError::Forbidden` (wrapped) when the
    /// form is missing or owned by someone else.
    pub async fn list_by_form(
        &self,
        owner_id: &str,
        form_id: Uuid,
    ) -> Result<FormSubmissions, SubmissionError> {
        let form = find_owned(self.forms.as_ref(), owner_id, form_id).await?;
        let submissions = self.submissions.list_by_form(form.id).await?;

        Ok(FormSubmissions {
            form_name: form.name,
            submissions,
        })
    }

    /// CSV export of a form's submissions, with the same checks as `list_by_form`.
    pub async fn export_csv(
        &self,
        owner_id: &str,
        form_id: Uuid,
    ) -> Result<(String, String), SubmissionError> {
        let listing = self.list_by_form(owner_id, form_id).await?;
        let csv = export_csv(&listing.submissions);
        Ok((listing.form_name, csv))
    }

    /// Delete a submission whose parent form is owned by `owner_id`.
    ///
    /// The parent form is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `SubmissionError::NotFound` or `SubmissionError::Forbidden`
    /// before anything is deleted.
    pub async fn delete(&self, owner_id: &str, submission_id: Uuid) -> Result<(), SubmissionError> {
        let submission = self
            .submissions
            .find_by_id(submission_id)
            .await?
            .ok_or(SubmissionError::NotFound(submission_id))?;

        let owned = self
            .forms
            .find_by_id(submission.form_id)
            .await?
            .is_some_and(|form| form.is_owned_by(owner_id));
        if !owned {
            return Err(SubmissionError::Forbidden(submission_id));
        }

        if !self.submissions.delete(submission_id).await? {
            return Err(SubmissionError::NotFound(submission_id));
        }

        tracing::info!(
            submission_id = %submission_id,
            form_id = %submission.form_id,
            "Submission deleted"
        );
        Ok(())
    }
}
