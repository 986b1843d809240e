//! Stored submissions.
//!
//! Submissions are written by the ingest path and only ever read, exported or
//! deleted afterwards, always by the owner of the parent form.

mod csv;
mod error;
mod service;
mod types;

pub use csv::{CSV_FIXED_HEADERS, export_csv};
pub use error::SubmissionError;
pub use service::{FormSubmissions, SubmissionRepository, SubmissionService};
pub use types::{
    FieldValue, FileDescriptor, NewSubmission, Submission, SubmissionData, UNKNOWN_CLIENT,
    UPLOAD_FAILED,
};
