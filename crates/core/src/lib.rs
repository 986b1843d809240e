//! Core business logic for FormRelay.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Persistence is reached through the repository traits each module declares;
//! the db crate implements them.
//!
//! # Modules
//!
//! - `form` - Form registry and capability key generation
//! - `submission` - Stored submissions, owner-scoped viewing and CSV export
//! - `ingest` - Public submission intake with per-file upload and notification
//! - `storage` - Object storage for uploaded files

pub mod form;
pub mod ingest;
pub mod storage;
pub mod submission;

#[cfg(test)]
mod test_support;
