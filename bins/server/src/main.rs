//! FormRelay API Server
//!
//! Main entry point for the FormRelay backend service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use formrelay_api::{AppState, create_router};
use formrelay_core::storage::{StorageConfig, StorageService};
use formrelay_db::connect_with;
use formrelay_shared::{AppConfig, EmailService, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "formrelay=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Connect to database
    let db = connect_with(&config.database).await?;
    info!("Connected to database");

    let jwt_service = JwtService::new(JwtConfig::from(&config.auth));

    // Create email service
    let email_service = EmailService::new(config.email.clone());
    info!(
        smtp_host = %config.email.smtp_host,
        smtp_port = %config.email.smtp_port,
        "Email service configured"
    );

    // Storage is optional; without it every file upload is recorded as failed
    let storage = match &config.storage {
        Some(settings) => {
            let storage_config =
                StorageConfig::from_settings(settings).context("Invalid storage configuration")?;
            let service = StorageService::from_config(storage_config)
                .context("Failed to initialize storage")?;
            info!(
                provider = service.provider_name(),
                folder = %service.config().folder,
                "Storage configured"
            );
            Some(Arc::new(service))
        }
        None => {
            warn!("Storage not configured; file uploads will be marked as failed");
            None
        }
    };

    // Create application state
    let state = AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(jwt_service),
        email_service: Arc::new(email_service),
        storage,
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
