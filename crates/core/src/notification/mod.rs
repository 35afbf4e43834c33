//! Notification record lifecycle.
//!
//! This module sequences object storage and document store calls for the
//! four notification operations:
//! - List records by title
//! - Create a record, optionally uploading its image first
//! - Update a record, replacing its image when a new one arrives
//! - Delete every record with a title together with its image

mod error;
mod memory;
mod service;
mod types;

pub use error::NotificationError;
pub use memory::InMemoryNotificationRepository;
pub use service::{NotificationRepository, NotificationService};
pub use types::{
    CreateNotificationInput, ImageUpload, NewNotification, Notification, NotificationPatch,
    UpdateNotificationInput,
};
