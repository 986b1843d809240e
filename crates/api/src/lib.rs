//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - The public submission endpoint
//! - Owner-scoped dashboard routes
//! - Authentication middleware and extractor
//! - The JSON error envelope

pub mod error;
pub mod middleware;
pub mod routes;

#[cfg(test)]
mod test_support;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use formrelay_core::storage::{StorageConfig, StorageService};
use formrelay_shared::{EmailService, JwtService};

/// Multipart overhead allowed on top of the largest accepted file.
const FORM_OVERHEAD_BYTES: u64 = 1024 * 1024;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token verification.
    pub jwt_service: Arc<JwtService>,
    /// Email service for submission notifications.
    pub email_service: Arc<EmailService>,
    /// Storage service for submitted files (optional).
    pub storage: Option<Arc<StorageService>>,
}

impl AppState {
    /// Largest request body the submission endpoint accepts.
    #[must_use]
    pub fn max_submission_body(&self) -> usize {
        let max_file = self
            .storage
            .as_ref()
            .map_or(StorageConfig::DEFAULT_MAX_FILE_SIZE, |s| s.config().max_file_size);
        usize::try_from(max_file.saturating_add(FORM_OVERHEAD_BYTES)).unwrap_or(usize::MAX)
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
