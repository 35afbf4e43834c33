//! Notification error types.

use thiserror::Error;

use crate::storage::StorageError;
use noticeboard_shared::AppError;

/// Notification operation errors.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// Missing or malformed input.
    #[error("validation failed: {0}")]
    Validation(String),

    /// No record carries the title.
    #[error("notification not found: {0}")]
    NotFound(String),

    /// An image the record points at is gone from storage.
    #[error("object not found: {0}")]
    ObjectNotFound(String),

    /// Storage operation failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Repository operation failed.
    #[error("repository error: {0}")]
    Repository(String),

    /// Staging the upload on local disk failed.
    #[error("staging error: {0}")]
    Staging(#[from] std::io::Error),
}

impl NotificationError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(title_name: impl Into<String>) -> Self {
        Self::NotFound(title_name.into())
    }

    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }
}

impl From<NotificationError> for AppError {
    fn from(err: NotificationError) -> Self {
        match err {
            NotificationError::Validation(msg) => Self::Validation(msg),
            NotificationError::Storage(StorageError::FileTooLarge { size, max }) => {
                Self::Validation(format!(
                    "file size {size} bytes exceeds maximum allowed {max} bytes"
                ))
            }
            NotificationError::NotFound(_) => Self::NotFound("Notification not found".into()),
            NotificationError::ObjectNotFound(_) => Self::NotFound("Object not found".into()),
            NotificationError::Storage(e) => Self::ExternalService(e.to_string()),
            NotificationError::Repository(msg) => Self::Database(msg),
            NotificationError::Staging(e) => Self::Internal(e.to_string()),
        }
    }
}
