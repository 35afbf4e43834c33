//! Noticeboard API Server
//!
//! Main entry point for the notification service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use noticeboard_api::{AppState, create_router};
use noticeboard_core::notification::NotificationService;
use noticeboard_core::staging::StagingArea;
use noticeboard_core::storage::{StorageConfig, StorageService};
use noticeboard_db::{NotificationRepository, connect_with};
use noticeboard_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "noticeboard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Connect to database
    let db = connect_with(&config.database).await?;
    info!("Connected to database");

    // Create storage service
    let storage_config = StorageConfig::from_settings(&config.storage)?;
    let storage = Arc::new(StorageService::from_config(storage_config)?);
    info!(
        provider = storage.provider_name(),
        bucket = storage.bucket(),
        "Storage service configured"
    );

    let staging = Arc::new(StagingArea::new(config.staging.dir.clone()));
    info!(dir = %staging.dir().display(), "Staging area configured");

    // Create application state
    let notifications = Arc::new(NotificationService::new(
        Arc::clone(&storage),
        staging,
        Arc::new(NotificationRepository::new(db)),
    ));
    let state = AppState {
        notifications,
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
