//! Shared fixtures for the route tests.

use std::sync::Arc;

use axum::{body::Body, http::Response};
use http_body_util::BodyExt;
use sea_orm::{ConnectOptions, Database};

use crate::AppState;
use formrelay_core::storage::StorageService;
use formrelay_db::migration::{Migrator, MigratorTrait};
use formrelay_shared::{EmailConfig, EmailService, JwtConfig, JwtService};

/// App state over a fresh in-memory database, without storage.
///
/// Notifications go to a closed local port, so every send fails fast.
pub async fn test_state() -> AppState {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(JwtService::new(JwtConfig::default())),
        email_service: Arc::new(EmailService::new(EmailConfig {
            smtp_host: "127.0.0.1".to_string(),
            smtp_port: 1,
            ..EmailConfig::default()
        })),
        storage: None,
    }
}

/// Same as [`test_state`] with storage attached.
pub async fn test_state_with_storage(storage: StorageService) -> AppState {
    AppState {
        storage: Some(Arc::new(storage)),
        ..test_state().await
    }
}

/// Bearer token for `user_id`, signed with the test secret.
pub fn token_for(state: &AppState, user_id: &str) -> String {
    state
        .jwt_service
        .generate_token(user_id, Some(&format!("{user_id}@example.com")), Some("Test User"))
        .expect("should generate token")
}

/// Reads a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let body = response
        .into_body()
        .collect()
        .await
        .expect("should read body")
        .to_bytes();
    serde_json::from_slice(&body).expect("body should be JSON")
}
