//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST routes for notifications
//! - The form extractor for multipart and JSON bodies
//! - Error-to-response mapping

pub mod error;
pub mod extractors;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use noticeboard_core::notification::{NotificationRepository, NotificationService};
use noticeboard_core::storage::{StorageProvider, StorageService};

/// Room left for form fields and multipart framing on top of the file itself.
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Application state shared across handlers.
pub struct AppState<R: NotificationRepository> {
    /// Notification orchestrator.
    pub notifications: Arc<NotificationService<R>>,
    /// Storage service, used for limits and serving local files.
    pub storage: Arc<StorageService>,
}

impl<R: NotificationRepository> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            notifications: Arc::clone(&self.notifications),
            storage: Arc::clone(&self.storage),
        }
    }
}

/// Creates the main application router.
pub fn create_router<R: NotificationRepository + 'static>(state: AppState<R>) -> Router {
    let max_file_size = usize::try_from(state.storage.config().max_file_size).unwrap_or(usize::MAX);
    let body_limit = max_file_size.saturating_add(FORM_OVERHEAD_BYTES);

    let mut router = Router::new().merge(routes::api_routes());

    // Local storage hands out URLs under /files, so it has to serve them too.
    if let StorageProvider::LocalFs { root, .. } = &state.storage.config().provider {
        router = router.nest_service("/files", ServeDir::new(root));
    }

    router
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
