//! Notification persistence boundary.
//!
//! A record must exist before any delivery is attempted; a failed save is
//! a hard failure for the whole dispatch. The store also backs the thin
//! listing endpoint.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use huddle_common::error::AppError;
use huddle_common::types::{Notification, NotificationFilter, StoredNotification};

/// Durable notification records.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Persist a record of the notification and return its identifier.
    async fn save(&self, notification: &Notification) -> Result<Uuid, AppError>;

    /// List persisted records, newest first.
    async fn list(
        &self,
        filter: &NotificationFilter,
    ) -> Result<Vec<StoredNotification>, AppError>;
}

/// PostgreSQL-backed notification store.
pub struct PgNotificationStore {
    pool: PgPool,
}

impl PgNotificationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for PgNotificationStore {
    async fn save(&self, notification: &Notification) -> Result<Uuid, AppError> {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO notifications
                (id, notification_type, channels, recipients, title, body, sms_message, data, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(id)
        .bind(notification.notification_type)
        .bind(serde_json::json!(notification.channels))
        .bind(serde_json::json!(notification.recipients))
        .bind(&notification.title)
        .bind(&notification.body)
        .bind(&notification.sms_message)
        .bind(serde_json::json!(notification.data))
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    async fn list(
        &self,
        filter: &NotificationFilter,
    ) -> Result<Vec<StoredNotification>, AppError> {
        let rows: Vec<StoredNotification> = match filter.notification_type {
            Some(notification_type) => {
                sqlx::query_as(
                    r#"
                    SELECT * FROM notifications
                    WHERE notification_type = $1
                    ORDER BY created_at DESC
                    "#,
                )
                .bind(notification_type)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as("SELECT * FROM notifications ORDER BY created_at DESC")
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(rows)
    }
}
