//! In-memory repositories and fakes shared by the unit tests.

use std::sync::Mutex;

use bytes::Bytes;
use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::form::{Form, FormError, FormRepository, FormSummary, NewForm, generate_form_key};
use crate::ingest::{FileUploader, SubmissionNotifier};
use crate::storage::{StorageError, UploadResult};
use crate::submission::{
    NewSubmission, Submission, SubmissionData, SubmissionError, SubmissionRepository,
};
use formrelay_shared::EmailError;

/// Builds a field map from a JSON object literal.
pub fn data(value: Value) -> SubmissionData {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

#[derive(Default)]
pub struct InMemoryForms {
    pub forms: Mutex<Vec<Form>>,
    pub counts: Mutex<Vec<(Uuid, u64)>>,
}

impl InMemoryForms {
    pub fn insert(&self, user_id: &str, name: &str) -> Form {
        self.insert_with_redirect(user_id, name, None)
    }

    pub fn insert_with_redirect(&self, user_id: &str, name: &str, redirect: Option<&str>) -> Form {
        let form = Form {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            name: name.to_string(),
            key: generate_form_key(),
            email: "owner@example.com".to_string(),
            description: None,
            redirect_url: redirect.map(str::to_string),
            created_at: Utc::now(),
        };
        self.forms.lock().unwrap().push(form.clone());
        form
    }
}

impl FormRepository for InMemoryForms {
    async fn list_by_owner(&self, user_id: &str) -> Result<Vec<FormSummary>, FormError> {
        let counts = self.counts.lock().unwrap();
        let mut forms: Vec<FormSummary> = self
            .forms
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.is_owned_by(user_id))
            .map(|f| FormSummary {
                form: f.clone(),
                submission_count: counts
                    .iter()
                    .find(|(id, _)| *id == f.id)
                    .map_or(0, |(_, n)| *n),
            })
            .collect();
        forms.sort_by(|a, b| b.form.created_at.cmp(&a.form.created_at));
        Ok(forms)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Form>, FormError> {
        Ok(self.forms.lock().unwrap().iter().find(|f| f.id == id).cloned())
    }

    async fn find_by_key(&self, key: &str) -> Result<Option<Form>, FormError> {
        Ok(self
            .forms
            .lock()
            .unwrap()
            .iter()
            .find(|f| f.key == key)
            .cloned())
    }

    async fn create(&self, input: NewForm) -> Result<Form, FormError> {
        let form = Form {
            id: Uuid::new_v4(),
            user_id: input.user_id,
            name: input.name,
            key: input.key,
            email: input.email,
            description: input.description,
            redirect_url: input.redirect_url,
            created_at: Utc::now(),
        };
        self.forms.lock().unwrap().push(form.clone());
        Ok(form)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, FormError> {
        let mut forms = self.forms.lock().unwrap();
        let before = forms.len();
        forms.retain(|f| f.id != id);
        Ok(forms.len() < before)
    }
}

#[derive(Default)]
pub struct InMemorySubmissions {
    pub rows: Mutex<Vec<Submission>>,
    pub fail_writes: bool,
}

impl InMemorySubmissions {
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn insert(&self, form_id: Uuid, data: SubmissionData) -> Submission {
        let submission = Submission {
            id: Uuid::new_v4(),
            form_id,
            data,
            files: None,
            ip_address: "unknown".to_string(),
            user_agent: "unknown".to_string(),
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(submission.clone());
        submission
    }
}

impl SubmissionRepository for InMemorySubmissions {
    async fn create(&self, input: NewSubmission) -> Result<Submission, SubmissionError> {
        if self.fail_writes {
            return Err(SubmissionError::repository("database is unavailable"));
        }
        let submission = Submission {
            id: Uuid::new_v4(),
            form_id: input.form_id,
            data: input.data,
            files: input.files,
            ip_address: input.ip_address,
            user_agent: input.user_agent,
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(submission.clone());
        Ok(submission)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Submission>, SubmissionError> {
        Ok(self.rows.lock().unwrap().iter().find(|s| s.id == id).cloned())
    }

    async fn list_by_form(&self, form_id: Uuid) -> Result<Vec<Submission>, SubmissionError> {
        let mut rows: Vec<Submission> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.form_id == form_id)
            .cloned()
            .collect();
        rows.reverse();
        Ok(rows)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, SubmissionError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|s| s.id != id);
        Ok(rows.len() < before)
    }
}

/// Uploader that fails for any filename starting with `fail`.
#[derive(Default)]
pub struct FakeUploader {
    pub uploaded: Mutex<Vec<String>>,
}

impl FileUploader for FakeUploader {
    async fn upload(
        &self,
        data: Bytes,
        filename: &str,
        content_type: &str,
    ) -> Result<UploadResult, StorageError> {
        if filename.starts_with("fail") {
            return Err(StorageError::operation("backend rejected the write"));
        }
        self.uploaded.lock().unwrap().push(filename.to_string());
        let key = format!("form-submissions/1-{filename}");
        Ok(UploadResult {
            secure_url: format!("https://files.example.com/{key}"),
            public_id: key,
            bytes: data.len() as u64,
            content_type: content_type.to_string(),
            original_filename: filename.to_string(),
            created_at: Utc::now(),
        })
    }
}

/// Records each notification, or fails every one when `fail` is set.
#[derive(Default)]
pub struct FakeNotifier {
    pub sent: Mutex<Vec<(String, String, SubmissionData, Option<SubmissionData>)>>,
    pub fail: bool,
}

impl FakeNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

impl SubmissionNotifier for FakeNotifier {
    async fn notify(
        &self,
        to: &str,
        form_name: &str,
        data: &SubmissionData,
        files: Option<&SubmissionData>,
    ) -> Result<(), EmailError> {
        if self.fail {
            return Err(EmailError::SendError("connection refused".to_string()));
        }
        self.sent.lock().unwrap().push((
            to.to_string(),
            form_name.to_string(),
            data.clone(),
            files.cloned(),
        ));
        Ok(())
    }
}
