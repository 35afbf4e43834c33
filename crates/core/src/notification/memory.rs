//! In-memory notification repository.
//!
//! Keeps records in insertion order, which is the order queries return them
//! in. Used by tests and local experiments without a database.

use tokio::sync::Mutex;
use uuid::Uuid;

use super::error::NotificationError;
use super::service::NotificationRepository;
use super::types::{NewNotification, Notification, NotificationPatch};

/// Notification repository backed by a `Vec`.
#[derive(Debug, Default)]
pub struct InMemoryNotificationRepository {
    notifications: Mutex<Vec<Notification>>,
}

impl InMemoryNotificationRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.notifications.lock().await.len()
    }

    /// Whether the repository holds no records.
    pub async fn is_empty(&self) -> bool {
        self.notifications.lock().await.is_empty()
    }
}

impl NotificationRepository for InMemoryNotificationRepository {
    async fn find_by_title(&self, title_name: &str) -> Result<Vec<Notification>, NotificationError> {
        Ok(self
            .notifications
            .lock()
            .await
            .iter()
            .filter(|n| n.title_name == title_name)
            .cloned()
            .collect())
    }

    async fn create(&self, input: NewNotification) -> Result<Notification, NotificationError> {
        let notification = Notification {
            id: Uuid::new_v4(),
            title_name: input.title_name,
            detail_notification: input.detail_notification,
            date_notification: input.date_notification,
            image_notification: input.image_notification,
        };
        self.notifications.lock().await.push(notification.clone());
        Ok(notification)
    }

    async fn update(&self, id: Uuid, patch: NotificationPatch) -> Result<(), NotificationError> {
        let mut notifications = self.notifications.lock().await;
        let notification = notifications
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| NotificationError::repository(format!("no record with id {id}")))?;
        patch.apply_to(notification);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, NotificationError> {
        let mut notifications = self.notifications.lock().await;
        let before = notifications.len();
        notifications.retain(|n| n.id != id);
        Ok(notifications.len() < before)
    }
}
