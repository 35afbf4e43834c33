//! Error responses.
//!
//! Failures are answered in plain text. Internal errors are logged and
//! collapsed to a generic message so callers cannot tell which step failed.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use noticeboard_core::notification::NotificationError;
use noticeboard_shared::AppError;
use tracing::error;

/// Body sent for every 5xx response.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// Error returned by route handlers.
#[derive(Debug)]
pub struct ApiError(AppError);

impl ApiError {
    /// 400 with the given message.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self(AppError::Validation(msg.into()))
    }

    /// 404 with the given message.
    #[must_use]
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self(AppError::NotFound(msg.into()))
    }

    /// The underlying application error.
    #[must_use]
    pub fn inner(&self) -> &AppError {
        &self.0
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<NotificationError> for ApiError {
    fn from(err: NotificationError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if self.0.is_internal() {
            error!(code = self.0.error_code(), error = %self.0, "Request failed");
            return (status, INTERNAL_ERROR_MESSAGE).into_response();
        }

        match self.0 {
            AppError::Validation(msg)
            | AppError::NotFound(msg)
            | AppError::Database(msg)
            | AppError::ExternalService(msg)
            | AppError::Internal(msg) => (status, msg).into_response(),
        }
    }
}
