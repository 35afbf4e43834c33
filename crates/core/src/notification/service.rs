//! Notification service implementation.

use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::error::NotificationError;
use super::types::{
    CreateNotificationInput, ImageUpload, NewNotification, Notification, NotificationPatch,
    UpdateNotificationInput,
};
use crate::staging::{StagedFile, StagingArea};
use crate::storage::{StorageError, StorageService};

/// Repository trait for notification persistence.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait NotificationRepository: Send + Sync {
    /// All records with the given title, in store order.
    fn find_by_title(
        &self,
        title_name: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Notification>, NotificationError>> + Send;

    /// Insert a record and return it with its assigned ID.
    fn create(
        &self,
        input: NewNotification,
    ) -> impl std::future::Future<Output = Result<Notification, NotificationError>> + Send;

    /// Apply a partial update to a record.
    fn update(
        &self,
        id: Uuid,
        patch: NotificationPatch,
    ) -> impl std::future::Future<Output = Result<(), NotificationError>> + Send;

    /// Delete a record by ID.
    fn delete(
        &self,
        id: Uuid,
    ) -> impl std::future::Future<Output = Result<bool, NotificationError>> + Send;
}

/// Notification service coordinating object storage and the document store.
pub struct NotificationService<R: NotificationRepository> {
    storage: Arc<StorageService>,
    staging: Arc<StagingArea>,
    repo: Arc<R>,
}

impl<R: NotificationRepository> NotificationService<R> {
    /// Create a new notification service.
    #[must_use]
    pub fn new(storage: Arc<StorageService>, staging: Arc<StagingArea>, repo: Arc<R>) -> Self {
        Self {
            storage,
            staging,
            repo,
        }
    }

    /// List every notification with the given title.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The title is empty
    /// - No record matches
    /// - The repository query fails
    pub async fn list_by_title(
        &self,
        title_name: &str,
    ) -> Result<Vec<Notification>, NotificationError> {
        if title_name.is_empty() {
            return Err(NotificationError::validation("titleName is required"));
        }

        let notifications = self.repo.find_by_title(title_name).await?;
        if notifications.is_empty() {
            return Err(NotificationError::not_found(title_name));
        }

        Ok(notifications)
    }

    /// Create a notification, uploading its image first when one is given.
    ///
    /// If the record write fails after the upload succeeded, the uploaded
    /// object stays in storage unreferenced.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The title is empty or the image is too large
    /// - Staging, upload or URL signing fails
    /// - The repository write fails
    pub async fn create(
        &self,
        input: CreateNotificationInput,
    ) -> Result<Notification, NotificationError> {
        if input.title_name.is_empty() {
            return Err(NotificationError::validation("titleName is required"));
        }

        let image_notification = match &input.image {
            Some(image) => self.upload_image(image, None).await?,
            None => String::new(),
        };

        let notification = self
            .repo
            .create(NewNotification {
                title_name: input.title_name,
                detail_notification: input.detail_notification,
                date_notification: input.date_notification,
                image_notification,
            })
            .await?;

        info!(
            id = %notification.id,
            title_name = %notification.title_name,
            has_image = notification.has_image(),
            "Notification created"
        );

        Ok(notification)
    }

    /// Update the first notification with the given title.
    ///
    /// Empty strings count as absent. A new image replaces the old one, whose
    /// object is deleted before the new one is uploaded.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No record matches
    /// - Any step of the image replacement fails
    /// - The repository write fails
    pub async fn update(
        &self,
        title_name: &str,
        input: UpdateNotificationInput,
    ) -> Result<(), NotificationError> {
        let existing = self
            .repo
            .find_by_title(title_name)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| NotificationError::not_found(title_name))?;

        let image_notification = match &input.image {
            Some(image) => Some(
                self.upload_image(image, Some(&existing.image_notification))
                    .await?,
            ),
            None => None,
        };

        let patch = NotificationPatch {
            detail_notification: input.detail_notification.filter(|s| !s.is_empty()),
            date_notification: input.date_notification.filter(|s| !s.is_empty()),
            image_notification,
        };

        if patch.is_empty() {
            debug!(id = %existing.id, "Nothing to update");
            return Ok(());
        }

        self.repo.update(existing.id, patch).await?;
        info!(id = %existing.id, title_name = %title_name, "Notification updated");

        Ok(())
    }

    /// Delete every notification with the given title, images included.
    ///
    /// Records are deleted concurrently. The call waits for all of them and
    /// fails if any one failed; records already deleted stay deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No record matches
    /// - An image or record deletion fails
    pub async fn delete(&self, title_name: &str) -> Result<usize, NotificationError> {
        let notifications = self.repo.find_by_title(title_name).await?;
        if notifications.is_empty() {
            return Err(NotificationError::not_found(title_name));
        }

        let mut pending = Vec::with_capacity(notifications.len());
        for notification in &notifications {
            pending.push(self.delete_one(notification));
        }

        for result in join_all(pending).await {
            result?;
        }

        info!(
            title_name = %title_name,
            count = notifications.len(),
            "Notifications deleted"
        );

        Ok(notifications.len())
    }

    async fn delete_one(&self, notification: &Notification) -> Result<(), NotificationError> {
        if notification.has_image() {
            let key = self.storage.object_key(&notification.image_notification)?;
            match self.storage.delete(&key).await {
                Ok(()) => info!(key = %key, "Deleted file"),
                Err(StorageError::NotFound { .. }) => {
                    error!(key = %key, "Error deleting file: object not found");
                    return Err(NotificationError::ObjectNotFound(key));
                }
                Err(e) => {
                    error!(key = %key, error = %e, "Error deleting file");
                    return Err(e.into());
                }
            }
        }

        if let Err(e) = self.repo.delete(notification.id).await {
            error!(id = %notification.id, error = %e, "Error deleting document");
            return Err(e);
        }

        Ok(())
    }

    /// Stage, upload and sign an image, returning its signed URL.
    ///
    /// When `replacing` is a non-empty URL, the object behind it is deleted
    /// before the upload.
    async fn upload_image(
        &self,
        image: &ImageUpload,
        replacing: Option<&str>,
    ) -> Result<String, NotificationError> {
        self.storage
            .validate_upload(u64::try_from(image.data.len()).unwrap_or(u64::MAX))?;

        let staged = self.staging.stage(&image.filename, &image.data).await?;

        match self.forward_staged(&staged, image, replacing).await {
            Ok(url) => {
                staged.remove().await?;
                Ok(url)
            }
            Err(e) => {
                if let Err(cleanup) = staged.remove().await {
                    warn!(error = %cleanup, "Failed to remove staged upload");
                }
                Err(e)
            }
        }
    }

    async fn forward_staged(
        &self,
        staged: &StagedFile,
        image: &ImageUpload,
        replacing: Option<&str>,
    ) -> Result<String, NotificationError> {
        if let Some(old_url) = replacing.filter(|url| !url.is_empty()) {
            let old_key = self.storage.object_key(old_url)?;
            self.storage.delete(&old_key).await?;
            info!(key = %old_key, "Deleted replaced image");
        }

        let key = StorageService::image_key(&image.filename, Utc::now());
        let data = staged.read().await?;
        self.storage.put(&key, data, &image.content_type).await?;

        let signed = self.storage.signed_read_url(&key).await?;
        debug!(
            key = %key,
            provider = self.storage.provider_name(),
            expires_at = %signed.expires_at,
            "Image uploaded"
        );

        Ok(signed.url)
    }
}
