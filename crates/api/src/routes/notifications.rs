//! Notification routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::{AppState, error::ApiError, extractors::NotificationForm};
use noticeboard_core::notification::{
    CreateNotificationInput, Notification, NotificationError, NotificationRepository,
    UpdateNotificationInput,
};

/// Creates the notification routes.
pub fn routes<R: NotificationRepository + 'static>() -> Router<AppState<R>> {
    Router::new()
        .route(
            "/notifications",
            get(list_notifications::<R>).post(create_notification::<R>),
        )
        .route(
            "/notifications/{title_name}",
            put(update_notification::<R>).delete(delete_notification::<R>),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query string for listing notifications.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// Title to match.
    pub title_name: Option<String>,
}

/// A notification as returned to clients.
#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    /// Record ID.
    pub id: Uuid,
    /// Record fields.
    pub data: NotificationData,
}

/// Stored fields of a notification.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationData {
    /// Title.
    pub title_name: String,
    /// Body text.
    pub detail_notification: String,
    /// Date string.
    pub date_notification: String,
    /// Signed image URL or empty.
    pub image_notification: String,
}

impl From<Notification> for NotificationResponse {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id,
            data: NotificationData {
                title_name: n.title_name,
                detail_notification: n.detail_notification,
                date_notification: n.date_notification,
                image_notification: n.image_notification,
            },
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /notifications?titleName=X
async fn list_notifications<R: NotificationRepository + 'static>(
    State(state): State<AppState<R>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<NotificationResponse>>, ApiError> {
    let title_name = query
        .title_name
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::validation("titleName parameter is required"))?;

    let notifications = state
        .notifications
        .list_by_title(&title_name)
        .await
        .map_err(|e| match e {
            NotificationError::NotFound(_) => ApiError::not_found("No notifications found"),
            other => other.into(),
        })?;

    Ok(Json(
        notifications
            .into_iter()
            .map(NotificationResponse::from)
            .collect(),
    ))
}

/// POST /notifications
async fn create_notification<R: NotificationRepository + 'static>(
    State(state): State<AppState<R>>,
    form: NotificationForm,
) -> Result<impl IntoResponse, ApiError> {
    let input = CreateNotificationInput {
        title_name: NotificationForm::require(form.title_name, "titleName")?,
        detail_notification: NotificationForm::require(
            form.detail_notification,
            "detailNotification",
        )?,
        date_notification: NotificationForm::require(form.date_notification, "dateNotification")?,
        image: form.image,
    };

    let notification = state.notifications.create(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(NotificationResponse::from(notification)),
    ))
}

/// PUT /notifications/{title_name}
async fn update_notification<R: NotificationRepository + 'static>(
    State(state): State<AppState<R>>,
    Path(title_name): Path<String>,
    form: NotificationForm,
) -> Result<&'static str, ApiError> {
    let input = UpdateNotificationInput {
        detail_notification: form.detail_notification,
        date_notification: form.date_notification,
        image: form.image,
    };

    state.notifications.update(&title_name, input).await?;

    Ok("Notification updated successfully")
}

/// DELETE /notifications/{title_name}
async fn delete_notification<R: NotificationRepository + 'static>(
    State(state): State<AppState<R>>,
    Path(title_name): Path<String>,
) -> Result<&'static str, ApiError> {
    let count = state.notifications.delete(&title_name).await?;
    info!(title_name = %title_name, count, "Delete request completed");

    Ok("Notification deleted successfully")
}
