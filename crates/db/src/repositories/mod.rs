//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod form;
pub mod submission;
pub mod user;

pub use form::FormRepository;
pub use submission::SubmissionRepository;
pub use user::UserRepository;
