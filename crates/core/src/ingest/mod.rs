//! Public submission intake.
//!
//! A form's key is the only credential needed to post to it. Each file field
//! is uploaded on its own; a failed upload is recorded inline and never aborts
//! the submission. The owner notification is best effort.

mod error;
mod service;
mod types;

pub use error::IngestError;
pub use service::{FileUploader, IngestService, SubmissionNotifier};
pub use types::{IncomingField, IncomingFile, IncomingValue, IngestOutcome, RequestMetadata};
