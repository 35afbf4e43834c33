//! API route definitions.

use axum::Router;
use noticeboard_core::notification::NotificationRepository;

use crate::AppState;

pub mod health;
pub mod notifications;

/// Creates the API router with all routes.
pub fn api_routes<R: NotificationRepository + 'static>() -> Router<AppState<R>> {
    Router::new()
        .merge(health::routes())
        .merge(notifications::routes())
}
