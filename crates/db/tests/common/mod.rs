//! Shared setup for repository integration tests.

#![allow(dead_code)]

use formrelay_core::form::{Form, FormRepository as _, NewForm, generate_form_key};
use formrelay_db::migration::{Migrator, MigratorTrait};
use formrelay_db::{FormRepository, UserRepository};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

/// Fresh in-memory SQLite database with the schema applied.
pub async fn setup() -> DatabaseConnection {
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
    db
}

/// Provisions `user_id` and creates a form owned by it.
pub async fn create_form(db: &DatabaseConnection, user_id: &str, name: &str) -> Form {
    UserRepository::new(db.clone())
        .provision(user_id, &format!("{user_id}@example.com"), "Test User")
        .await
        .expect("Failed to provision user");

    FormRepository::new(db.clone())
        .create(NewForm {
            user_id: user_id.to_string(),
            name: name.to_string(),
            key: generate_form_key(),
            email: "owner@example.com".to_string(),
            description: None,
            redirect_url: None,
        })
        .await
        .expect("Failed to create form")
}
