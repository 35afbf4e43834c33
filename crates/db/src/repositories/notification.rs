//! Notification repository for database operations.
//!
//! Implements the document store contract using SeaORM.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::debug;
use uuid::Uuid;

use crate::entities::notifications;
use noticeboard_core::notification::{
    NewNotification, Notification, NotificationError,
    NotificationRepository as NotificationRepoTrait, NotificationPatch,
};

/// Notification repository implementation.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    db: DatabaseConnection,
}

impl NotificationRepository {
    /// Create a new notification repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl NotificationRepoTrait for NotificationRepository {
    async fn find_by_title(&self, title_name: &str) -> Result<Vec<Notification>, NotificationError> {
        let models = notifications::Entity::find()
            .filter(notifications::Column::TitleName.eq(title_name))
            .order_by_asc(notifications::Column::CreatedAt)
            .order_by_asc(notifications::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| NotificationError::repository(e.to_string()))?;

        Ok(models.into_iter().map(to_domain).collect())
    }

    async fn create(&self, input: NewNotification) -> Result<Notification, NotificationError> {
        let now = Utc::now().into();
        let active_model = notifications::ActiveModel {
            id: Set(Uuid::new_v4()),
            title_name: Set(input.title_name),
            detail_notification: Set(input.detail_notification),
            date_notification: Set(input.date_notification),
            image_notification: Set(input.image_notification),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| NotificationError::repository(e.to_string()))?;
        debug!(id = %model.id, "Inserted notification row");

        Ok(to_domain(model))
    }

    async fn update(&self, id: Uuid, patch: NotificationPatch) -> Result<(), NotificationError> {
        if patch.is_empty() {
            return Ok(());
        }

        let mut update = notifications::Entity::update_many()
            .col_expr(
                notifications::Column::UpdatedAt,
                Expr::value(Utc::now().fixed_offset()),
            )
            .filter(notifications::Column::Id.eq(id));

        if let Some(detail) = patch.detail_notification {
            update = update.col_expr(notifications::Column::DetailNotification, Expr::value(detail));
        }
        if let Some(date) = patch.date_notification {
            update = update.col_expr(notifications::Column::DateNotification, Expr::value(date));
        }
        if let Some(image) = patch.image_notification {
            update = update.col_expr(notifications::Column::ImageNotification, Expr::value(image));
        }

        let result = update
            .exec(&self.db)
            .await
            .map_err(|e| NotificationError::repository(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(NotificationError::repository(format!(
                "no record with id {id}"
            )));
        }

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, NotificationError> {
        let result = notifications::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| NotificationError::repository(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }
}

/// Convert database model to domain model.
fn to_domain(model: notifications::Model) -> Notification {
    Notification {
        id: model.id,
        title_name: model.title_name,
        detail_notification: model.detail_notification,
        date_notification: model.date_notification,
        image_notification: model.image_notification,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_domain() {
        let now = Utc::now().into();
        let id = Uuid::new_v4();
        let model = notifications::Model {
            id,
            title_name: "A".to_string(),
            detail_notification: "d1".to_string(),
            date_notification: "2024-01-01".to_string(),
            image_notification: String::new(),
            created_at: now,
            updated_at: now,
        };

        let notification = to_domain(model);
        assert_eq!(notification.id, id);
        assert_eq!(notification.title_name, "A");
        assert!(!notification.has_image());
    }
}
