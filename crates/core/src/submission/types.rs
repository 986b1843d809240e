//! Submission domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Field name to stored value, in the order fields were posted.
pub type SubmissionData = Map<String, Value>;

/// Marker stored in a file descriptor whose upload failed.
pub const UPLOAD_FAILED: &str = "Upload failed";

/// Recorded when the client did not send an IP or user agent.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// One recorded submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submission {
    /// Submission ID.
    pub id: Uuid,
    /// Parent form.
    pub form_id: Uuid,
    /// Posted fields.
    pub data: SubmissionData,
    /// Raw uploader results for files that were stored.
    pub files: Option<SubmissionData>,
    /// Submitter IP address.
    pub ip_address: String,
    /// Submitter user agent.
    pub user_agent: String,
    /// Submission time.
    pub created_at: DateTime<Utc>,
}

/// A submission ready to be persisted.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    /// Parent form.
    pub form_id: Uuid,
    /// Posted fields.
    pub data: SubmissionData,
    /// Raw uploader results; `None` when no upload succeeded.
    pub files: Option<SubmissionData>,
    /// Submitter IP address.
    pub ip_address: String,
    /// Submitter user agent.
    pub user_agent: String,
}

/// Typed view of one stored field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Plain form value.
    Text(String),
    /// Uploaded (or attempted) file.
    File(FileDescriptor),
}

impl FieldValue {
    /// Reads a stored JSON value back into its typed form.
    ///
    /// Returns `None` for values the ingest path never writes.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    /// The JSON representation stored in `Submission::data`.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Text(text) => Value::String(text.clone()),
            Self::File(file) => serde_json::to_value(file).unwrap_or(Value::Null),
        }
    }
}

/// Metadata recorded for a file field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptor {
    /// Client-supplied filename.
    pub filename: String,
    /// Size in bytes.
    pub size: u64,
    /// Client-supplied MIME type.
    pub content_type: String,
    /// Public URL of the stored object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_url: Option<String>,
    /// Failure marker when the upload did not succeed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileDescriptor {
    /// Descriptor for a stored file.
    #[must_use]
    pub fn uploaded(
        filename: impl Into<String>,
        size: u64,
        content_type: impl Into<String>,
        storage_url: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            size,
            content_type: content_type.into(),
            storage_url: Some(storage_url.into()),
            error: None,
        }
    }

    /// Descriptor for a file whose upload failed.
    #[must_use]
    pub fn failed(filename: impl Into<String>, size: u64, content_type: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            size,
            content_type: content_type.into(),
            storage_url: None,
            error: Some(UPLOAD_FAILED.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_uploaded_descriptor_json_shape() {
        let file = FileDescriptor::uploaded("cv.pdf", 2048, "application/pdf", "https://x/cv.pdf");
        assert_eq!(
            FieldValue::File(file).to_value(),
            json!({
                "filename": "cv.pdf",
                "size": 2048,
                "contentType": "application/pdf",
                "storageUrl": "https://x/cv.pdf"
            })
        );
    }

    #[test]
    fn test_failed_descriptor_json_shape() {
        let file = FileDescriptor::failed("cv.pdf", 2048, "application/pdf");
        assert_eq!(file.error.as_deref(), Some(UPLOAD_FAILED));
        assert_eq!(
            FieldValue::File(file).to_value(),
            json!({
                "filename": "cv.pdf",
                "size": 2048,
                "contentType": "application/pdf",
                "error": "Upload failed"
            })
        );
    }

    #[test]
    fn test_from_value_classifies_stored_values() {
        assert_eq!(
            FieldValue::from_value(&json!("Bob")),
            Some(FieldValue::Text("Bob".to_string()))
        );
        assert!(matches!(
            FieldValue::from_value(&json!({"filename": "a.txt", "size": 1, "contentType": "text/plain"})),
            Some(FieldValue::File(_))
        ));
        assert_eq!(FieldValue::from_value(&json!({"nested": true})), None);
        assert_eq!(FieldValue::from_value(&json!(42)), None);
    }
}
