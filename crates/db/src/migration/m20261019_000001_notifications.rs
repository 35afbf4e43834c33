//! Notifications table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(NOTIFICATIONS_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("DROP TABLE IF EXISTS notifications CASCADE;")
            .await?;
        Ok(())
    }
}

const NOTIFICATIONS_SQL: &str = r"
-- Notification records. title_name is a lookup key, not a unique key.
CREATE TABLE notifications (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    title_name TEXT NOT NULL,
    detail_notification TEXT NOT NULL DEFAULT '',
    date_notification TEXT NOT NULL DEFAULT '',
    image_notification TEXT NOT NULL DEFAULT '',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Lookups by title, returned in insertion order
CREATE INDEX idx_notifications_title ON notifications(title_name, created_at);
";
