//! Notification types and data structures.

use bytes::Bytes;
use uuid::Uuid;

/// Notification domain model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Identifier assigned by the document store.
    pub id: Uuid,
    /// Title, used as the lookup key. Not unique.
    pub title_name: String,
    /// Body text.
    pub detail_notification: String,
    /// Caller-supplied date, stored verbatim.
    pub date_notification: String,
    /// Signed read URL of the image, or empty.
    pub image_notification: String,
}

impl Notification {
    /// Whether the record references an image.
    #[must_use]
    pub fn has_image(&self) -> bool {
        !self.image_notification.is_empty()
    }
}

/// An uploaded image file.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Original filename.
    pub filename: String,
    /// MIME type reported by the client.
    pub content_type: String,
    /// File contents.
    pub data: Bytes,
}

/// Input for creating a notification.
#[derive(Debug, Clone)]
pub struct CreateNotificationInput {
    /// Title.
    pub title_name: String,
    /// Body text.
    pub detail_notification: String,
    /// Date string.
    pub date_notification: String,
    /// Optional image.
    pub image: Option<ImageUpload>,
}

/// Input for updating a notification. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateNotificationInput {
    /// New body text.
    pub detail_notification: Option<String>,
    /// New date string.
    pub date_notification: Option<String>,
    /// Replacement image.
    pub image: Option<ImageUpload>,
}

/// Record as handed to the document store for insertion.
#[derive(Debug, Clone)]
pub struct NewNotification {
    /// Title.
    pub title_name: String,
    /// Body text.
    pub detail_notification: String,
    /// Date string.
    pub date_notification: String,
    /// Signed image URL or empty.
    pub image_notification: String,
}

/// Partial update applied by the document store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationPatch {
    /// New body text.
    pub detail_notification: Option<String>,
    /// New date string.
    pub date_notification: Option<String>,
    /// New signed image URL.
    pub image_notification: Option<String>,
}

impl NotificationPatch {
    /// Whether applying the patch would change nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.detail_notification.is_none()
            && self.date_notification.is_none()
            && self.image_notification.is_none()
    }

    /// Apply the patch to a record in place.
    pub fn apply_to(&self, notification: &mut Notification) {
        if let Some(detail) = &self.detail_notification {
            notification.detail_notification.clone_from(detail);
        }
        if let Some(date) = &self.date_notification {
            notification.date_notification.clone_from(date);
        }
        if let Some(image) = &self.image_notification {
            notification.image_notification.clone_from(image);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Notification {
        Notification {
            id: Uuid::new_v4(),
            title_name: "A".to_string(),
            detail_notification: "d1".to_string(),
            date_notification: "2024-01-01".to_string(),
            image_notification: String::new(),
        }
    }

    #[test]
    fn test_has_image() {
        let mut notification = sample();
        assert!(!notification.has_image());
        notification.image_notification = "https://example.com/b/images/1_a.png".to_string();
        assert!(notification.has_image());
    }

    #[test]
    fn test_patch_applies_only_supplied_fields() {
        let mut notification = sample();
        let patch = NotificationPatch {
            date_notification: Some("2024-02-02".to_string()),
            ..NotificationPatch::default()
        };
        assert!(!patch.is_empty());

        patch.apply_to(&mut notification);
        assert_eq!(notification.detail_notification, "d1");
        assert_eq!(notification.date_notification, "2024-02-02");
        assert_eq!(notification.image_notification, "");
    }

    #[test]
    fn test_empty_patch() {
        assert!(NotificationPatch::default().is_empty());
    }
}
