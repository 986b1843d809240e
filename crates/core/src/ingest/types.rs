//! Ingest request and outcome types.

use bytes::Bytes;

use crate::submission::{Submission, UNKNOWN_CLIENT};

/// One named field of a posted form, in body order.
#[derive(Debug, Clone)]
pub struct IncomingField {
    /// Field name.
    pub name: String,
    /// Field payload.
    pub value: IncomingValue,
}

impl IncomingField {
    /// A plain text field.
    #[must_use]
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: IncomingValue::Text(value.into()),
        }
    }

    /// A file field.
    #[must_use]
    pub fn file(
        name: impl Into<String>,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Bytes,
    ) -> Self {
        Self {
            name: name.into(),
            value: IncomingValue::File(IncomingFile {
                filename: filename.into(),
                content_type: content_type.into(),
                bytes,
            }),
        }
    }
}

/// Payload of an incoming field.
#[derive(Debug, Clone)]
pub enum IncomingValue {
    /// Plain value.
    Text(String),
    /// Part that carried a filename.
    File(IncomingFile),
}

/// A file part as received.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    /// Client-supplied filename.
    pub filename: String,
    /// Client-supplied MIME type.
    pub content_type: String,
    /// File contents.
    pub bytes: Bytes,
}

impl IncomingFile {
    /// Size in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Who sent the submission, as far as the request tells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestMetadata {
    /// Client IP address.
    pub ip_address: String,
    /// Client user agent.
    pub user_agent: String,
}

impl RequestMetadata {
    /// Builds metadata from raw header values.
    ///
    /// The IP is the first entry of `X-Forwarded-For`. Missing or blank
    /// values are recorded as `unknown`.
    #[must_use]
    pub fn from_headers(forwarded_for: Option<&str>, user_agent: Option<&str>) -> Self {
        let ip_address = forwarded_for
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(UNKNOWN_CLIENT);
        let user_agent = user_agent
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(UNKNOWN_CLIENT);

        Self {
            ip_address: ip_address.to_string(),
            user_agent: user_agent.to_string(),
        }
    }
}

impl Default for RequestMetadata {
    fn default() -> Self {
        Self::from_headers(None, None)
    }
}

/// Result of a successful intake.
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    /// The stored submission.
    pub submission: Submission,
    /// Where to send the submitter, if the form has a redirect.
    pub redirect_url: Option<String>,
}
