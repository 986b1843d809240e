//! Submission intake service implementation.

use std::sync::Arc;

use bytes::Bytes;
use serde_json::Value;

use super::error::IngestError;
use super::types::{IncomingField, IncomingFile, IncomingValue, IngestOutcome, RequestMetadata};
use crate::form::{Form, FormRepository, is_valid_form_key};
use crate::storage::{StorageError, StorageService, UploadResult};
use crate::submission::{
    FieldValue, FileDescriptor, NewSubmission, SubmissionData, SubmissionRepository,
};
use formrelay_shared::{EmailError, EmailService};

/// Stores submitted files.
///
/// Implemented by [`StorageService`]; tests substitute their own.
pub trait FileUploader: Send + Sync {
    /// Store one file and report where it lives.
    fn upload(
        &self,
        data: Bytes,
        filename: &str,
        content_type: &str,
    ) -> impl std::future::Future<Output = Result<UploadResult, StorageError>> + Send;
}

impl FileUploader for StorageService {
    async fn upload(
        &self,
        data: Bytes,
        filename: &str,
        content_type: &str,
    ) -> Result<UploadResult, StorageError> {
        StorageService::upload(self, data, filename, content_type).await
    }
}

/// Tells a form owner about a new submission.
///
/// Implemented by [`EmailService`]; tests substitute their own.
pub trait SubmissionNotifier: Send + Sync {
    /// Send the notification.
    fn notify(
        &self,
        to: &str,
        form_name: &str,
        data: &SubmissionData,
        files: Option<&SubmissionData>,
    ) -> impl std::future::Future<Output = Result<(), EmailError>> + Send;
}

impl SubmissionNotifier for EmailService {
    async fn notify(
        &self,
        to: &str,
        form_name: &str,
        data: &SubmissionData,
        files: Option<&SubmissionData>,
    ) -> Result<(), EmailError> {
        self.send_submission_notification(to, form_name, data, files)
            .await
    }
}

/// Public submission intake.
pub struct IngestService<F, S, U, N>
where
    F: FormRepository,
    S: SubmissionRepository,
    U: FileUploader,
    N: SubmissionNotifier,
{
    forms: Arc<F>,
    submissions: Arc<S>,
    uploader: Option<Arc<U>>,
    notifier: Arc<N>,
}

impl<F, S, U, N> IngestService<F, S, U, N>
where
    F: FormRepository,
    S: SubmissionRepository,
    U: FileUploader,
    N: SubmissionNotifier,
{
    /// Create a new ingest service. Without an uploader every file is
    /// recorded as a failed upload.
    #[must_use]
    pub fn new(
        forms: Arc<F>,
        submissions: Arc<S>,
        uploader: Option<Arc<U>>,
        notifier: Arc<N>,
    ) -> Self {
        Self {
            forms,
            submissions,
            uploader,
            notifier,
        }
    }

    /// Resolve the form a key points at.
    ///
    /// # Errors
    ///
    /// Returns `IngestError::UnknownKey` if no form has this key.
    pub async fn find_form(&self, key: &str) -> Result<Form, IngestError> {
        if !is_valid_form_key(key) {
            return Err(IngestError::UnknownKey(key.to_string()));
        }
        self.forms
            .find_by_key(key)
            .await?
            .ok_or_else(|| IngestError::UnknownKey(key.to_string()))
    }

    /// Record a submission for `form`.
    ///
    /// Files are uploaded one at a time in field order. Upload and
    /// notification failures are logged and recorded, never returned.
    ///
    /// # Errors
    ///
    /// Returns `IngestError::Submission` if the submission cannot be stored.
    pub async fn submit(
        &self,
        form: &Form,
        fields: Vec<IncomingField>,
        metadata: RequestMetadata,
    ) -> Result<IngestOutcome, IngestError> {
        let mut data = SubmissionData::new();
        // Null marks a field whose latest value is not a stored file.
        let mut files = SubmissionData::new();

        for field in fields {
            match field.value {
                IncomingValue::Text(text) => {
                    if files.contains_key(&field.name) {
                        files.insert(field.name.clone(), Value::Null);
                    }
                    data.insert(field.name, FieldValue::Text(text).to_value());
                }
                IncomingValue::File(file) => {
                    let (descriptor, result) = self.store_file(form, &field.name, file).await;
                    files.insert(
                        field.name.clone(),
                        result
                            .and_then(|r| serde_json::to_value(r).ok())
                            .unwrap_or(Value::Null),
                    );
                    data.insert(field.name, FieldValue::File(descriptor).to_value());
                }
            }
        }

        let files: SubmissionData = files.into_iter().filter(|(_, v)| !v.is_null()).collect();
        let files = (!files.is_empty()).then_some(files);

        let submission = self
            .submissions
            .create(NewSubmission {
                form_id: form.id,
                data,
                files,
                ip_address: metadata.ip_address,
                user_agent: metadata.user_agent,
            })
            .await?;

        tracing::info!(
            form_id = %form.id,
            submission_id = %submission.id,
            fields = submission.data.len(),
            "Submission received"
        );

        if let Err(e) = self
            .notifier
            .notify(
                &form.email,
                &form.name,
                &submission.data,
                submission.files.as_ref(),
            )
            .await
        {
            tracing::warn!(
                form_id = %form.id,
                submission_id = %submission.id,
                error = %e,
                "Failed to send submission notification"
            );
        }

        Ok(IngestOutcome {
            redirect_url: form.redirect_url.clone(),
            submission,
        })
    }

    async fn store_file(
        &self,
        form: &Form,
        field: &str,
        file: IncomingFile,
    ) -> (FileDescriptor, Option<UploadResult>) {
        let size = file.size();
        let outcome = match &self.uploader {
            Some(uploader) => {
                uploader
                    .upload(file.bytes, &file.filename, &file.content_type)
                    .await
            }
            None => Err(StorageError::NotConfigured),
        };

        match outcome {
            Ok(result) => (
                FileDescriptor::uploaded(
                    file.filename,
                    size,
                    file.content_type,
                    result.secure_url.clone(),
                ),
                Some(result),
            ),
            Err(e) => {
                tracing::warn!(
                    form_id = %form.id,
                    field = %field,
                    filename = %file.filename,
                    error = %e,
                    "File upload failed"
                );
                (
                    FileDescriptor::failed(file.filename, size, file.content_type),
                    None,
                )
            }
        }
    }
}
