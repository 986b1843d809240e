//! Object storage for submitted files using Apache OpenDAL.
//!
//! This module provides vendor-agnostic object storage with support for:
//! - S3-compatible: Cloudflare R2, Supabase Storage, AWS S3, DigitalOcean Spaces
//! - Azure Blob Storage
//! - Local filesystem (development only)
//!
//! Objects are written under a single folder with a key that cannot collide:
//!
//! ```text
//! {folder}/{unix_millis}-{8 random hex}-{sanitized filename}
//! ```
//!
//! and are served from `{public_base_url}/{key}`.

mod config;
mod error;
mod service;

pub use config::{StorageConfig, StorageProvider};
pub use error::StorageError;
pub use service::{StorageService, UploadResult};
