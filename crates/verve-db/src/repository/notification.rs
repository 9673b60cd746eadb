//! # Notification Repository
//!
//! Best-effort notification rows.
//!
//! Notifications are explicitly outside the settlement consistency boundary:
//! they are written after commit by a spawned task, and a failed write is
//! logged and dropped, never surfaced to the buyer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;

/// Who a notification is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Shown to the buyer.
    User,
    /// Shown in admin tooling.
    Admin,
}

/// A stored notification.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Notification {
    pub id: String,
    pub message: String,
    pub kind: NotificationKind,
    pub created_at: DateTime<Utc>,
}

/// Repository for notification rows.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: SqlitePool,
}

impl NotificationRepository {
    /// Creates a new NotificationRepository.
    pub fn new(pool: SqlitePool) -> Self {
        NotificationRepository { pool }
    }

    /// Inserts a notification row.
    pub async fn insert(&self, message: &str, kind: NotificationKind) -> DbResult<Notification> {
        let notification = Notification {
            id: Uuid::new_v4().to_string(),
            message: message.to_string(),
            kind,
            created_at: Utc::now(),
        };

        debug!(id = %notification.id, "Inserting notification");

        sqlx::query(
            r#"
            INSERT INTO notifications (id, message, kind, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&notification.id)
        .bind(&notification.message)
        .bind(notification.kind)
        .bind(notification.created_at)
        .execute(&self.pool)
        .await?;

        Ok(notification)
    }

    /// Lists notifications, newest first.
    pub async fn list(&self, limit: i64) -> DbResult<Vec<Notification>> {
        let notifications: Vec<Notification> = sqlx::query_as(
            r#"
            SELECT id, message, kind, created_at
            FROM notifications
            ORDER BY created_at DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(notifications)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_insert_and_list() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.notifications();

        repo.insert("Payment of 25.99 received", NotificationKind::User)
            .await
            .unwrap();
        repo.insert("New return requested", NotificationKind::Admin)
            .await
            .unwrap();

        let listed = repo.list(10).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].message, "New return requested");
        assert_eq!(listed[0].kind, NotificationKind::Admin);
    }
}
