//! Shared configuration, errors, auth and email for FormRelay.
//!
//! This crate provides common pieces used across all other crates:
//! - Application-wide error taxonomy
//! - Configuration management
//! - Identity-provider token claims and verification
//! - SMTP email delivery and the submission notification template

pub mod auth;
pub mod config;
pub mod email;
pub mod error;
pub mod jwt;
pub mod notification;

pub use auth::Claims;
pub use config::{AppConfig, AuthConfig, EmailConfig, StorageSettings};
pub use email::{EmailError, EmailService};
pub use error::AppError;
pub use jwt::{JwtConfig, JwtError, JwtService};
