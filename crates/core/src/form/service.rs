//! Form registry service implementation.

use std::sync::Arc;

use uuid::Uuid;

use super::error::FormError;
use super::key::generate_form_key;
use super::types::{CreateFormInput, Form, FormSummary, NewForm};

/// Repository trait for form persistence.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait FormRepository: Send + Sync {
    /// List a user's forms with submission counts, newest first.
    fn list_by_owner(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<FormSummary>, FormError>> + Send;

    /// Find form by ID.
    fn find_by_id(
        &self,
        id: Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Form>, FormError>> + Send;

    /// Find form by its public key.
    fn find_by_key(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<Form>, FormError>> + Send;

    /// Persist a new form.
    fn create(
        &self,
        input: NewForm,
    ) -> impl std::future::Future<Output = Result<Form, FormError>> + Send;

    /// Delete a form and its submissions.
    fn delete(&self, id: Uuid) -> impl std::future::Future<Output = Result<bool, FormError>> + Send;
}

/// Form registry service.
pub struct FormService<R: FormRepository> {
    repo: Arc<R>,
}

impl<R: FormRepository> FormService<R> {
    /// Create a new form service.
    #[must_use]
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// All forms owned by `owner_id`, newest first, with submission counts.
    pub async fn list(&self, owner_id: &str) -> Result<Vec<FormSummary>, FormError> {
        self.repo.list_by_owner(owner_id).await
    }

    /// Create a form with a freshly generated key.
    ///
    /// # Errors
    ///
    /// Returns `FormError::Validation` if name or email is missing or blank,
    /// or if the redirect URL is not an absolute http(s) URL.
    pub async fn create(&self, owner_id: &str, input: CreateFormInput) -> Result<Form, FormError> {
        let (Some(name), Some(email)) = (non_blank(input.name), non_blank(input.email)) else {
            return Err(FormError::Validation(
                "Name and email are required".to_string(),
            ));
        };

        let redirect_url = non_blank(input.redirect_url);
        if redirect_url
            .as_deref()
            .is_some_and(|url| !is_valid_redirect_url(url))
        {
            return Err(FormError::Validation(
                "Redirect URL must be an absolute http(s) URL".to_string(),
            ));
        }

        let form = self
            .repo
            .create(NewForm {
                user_id: owner_id.to_string(),
                name,
                key: generate_form_key(),
                email,
                description: non_blank(input.description),
                redirect_url,
            })
            .await?;

        tracing::info!(form_id = %form.id, owner_id = %owner_id, "Form created");
        Ok(form)
    }

    /// Fetch a form, checking it exists and belongs to `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns `FormError::NotFound` or `FormError::Forbidden`.
    pub async fn get_owned(&self, owner_id: &str, form_id: Uuid) -> Result<Form, FormError> {
        find_owned(self.repo.as_ref(), owner_id, form_id).await
    }

    /// Delete a form owned by `owner_id`, cascading to its submissions.
    ///
    /// # Errors
    ///
    /// Returns `FormError::NotFound` or `FormError::Forbidden` before anything is deleted.
    pub async fn delete(&self, owner_id: &str, form_id: Uuid) -> Result<(), FormError> {
        let form = self.get_owned(owner_id, form_id).await?;

        if !self.repo.delete(form.id).await? {
            return Err(FormError::NotFound(form_id));
        }

        tracing::info!(form_id = %form_id, owner_id = %owner_id, "Form deleted");
        Ok(())
    }
}

/// Look up a form and enforce ownership.
pub(crate) async fn find_owned<R: FormRepository>(
    repo: &R,
    owner_id: &str,
    form_id: Uuid,
) -> Result<Form, FormError> {
    let form = repo
        .find_by_id(form_id)
        .await?
        .ok_or(FormError::NotFound(form_id))?;

    if !form.is_owned_by(owner_id) {
        return Err(FormError::Forbidden(form_id));
    }

    Ok(form)
}

/// Trimmed value, or `None` when absent or blank.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Absolute http(s) URL made of visible ASCII only, so it is always a
/// valid `Location` header.
#[must_use]
pub fn is_valid_redirect_url(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    let Some(rest) = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"))
    else {
        return false;
    };

    !rest.is_empty() && !rest.starts_with('/') && url.bytes().all(|b| b.is_ascii_graphic())
}
