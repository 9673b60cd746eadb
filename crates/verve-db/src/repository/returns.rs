//! # Return Repository
//!
//! The return/refund workflow: creation and status transitions, including the
//! order side effects of terminal resolutions.
//!
//! ## Transactional Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 set_status("Refunded") - one transaction                │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    UPDATE returns SET status = 'Refunded' WHERE id = ?                  │
//! │    UPDATE orders  SET payment_status = 'refunded' WHERE id = order_id   │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  The return status and the order side effect land together or not at    │
//! │  all - a reader can never observe a refunded return whose order still   │
//! │  says 'success'.                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Duplicate prevention is the UNIQUE index on `returns.order_id`; two
//! concurrent creation requests race to the index, not to a read-check.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use verve_core::returns::order_effect;
use verve_core::{ReturnRequest, ReturnStatus};

/// Columns selected for every `ReturnRequest` read; keep in sync with the struct.
const RETURN_COLUMNS: &str = r#"
    id, order_id, buyer_id, reason, status, created_at, updated_at
"#;

/// Repository for return-request database operations.
#[derive(Debug, Clone)]
pub struct ReturnRepository {
    pool: SqlitePool,
}

impl ReturnRepository {
    /// Creates a new ReturnRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReturnRepository { pool }
    }

    /// Creates a return request for an order.
    ///
    /// ## Errors
    /// * `NotFound` - the order does not exist
    /// * `UniqueViolation` on `returns.order_id` - a return already exists
    ///   for this order (callers surface this as a duplicate-return error)
    pub async fn create(&self, order_id: &str, reason: &str) -> DbResult<ReturnRequest> {
        // The buyer on the return is the buyer on the order, never
        // caller-supplied.
        let buyer_id: Option<String> =
            sqlx::query_scalar("SELECT buyer_id FROM orders WHERE id = ?1")
                .bind(order_id)
                .fetch_optional(&self.pool)
                .await?;

        let buyer_id = buyer_id.ok_or_else(|| DbError::not_found("Order", order_id))?;

        let now = Utc::now();
        let request = ReturnRequest {
            id: Uuid::new_v4().to_string(),
            order_id: order_id.to_string(),
            buyer_id,
            reason: reason.to_string(),
            status: ReturnStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %request.id, order_id = %order_id, "Creating return request");

        sqlx::query(
            r#"
            INSERT INTO returns (
                id, order_id, buyer_id, reason, status, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&request.id)
        .bind(&request.order_id)
        .bind(&request.buyer_id)
        .bind(&request.reason)
        .bind(request.status)
        .bind(request.created_at)
        .bind(request.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(request)
    }

    /// Gets a return request by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<ReturnRequest>> {
        let request: Option<ReturnRequest> = sqlx::query_as(&format!(
            "SELECT {RETURN_COLUMNS} FROM returns WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    /// Gets the return request for an order, if any.
    pub async fn get_by_order(&self, order_id: &str) -> DbResult<Option<ReturnRequest>> {
        let request: Option<ReturnRequest> = sqlx::query_as(&format!(
            "SELECT {RETURN_COLUMNS} FROM returns WHERE order_id = ?1"
        ))
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    /// Lists all return requests, newest first (admin view).
    pub async fn list_all(&self) -> DbResult<Vec<ReturnRequest>> {
        let requests: Vec<ReturnRequest> = sqlx::query_as(&format!(
            "SELECT {RETURN_COLUMNS} FROM returns ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    /// Sets a return request's status, applying order side effects atomically.
    ///
    /// Reaching `Refunded` marks the linked order's payment as refunded;
    /// reaching `Replaced` resets the linked order's delivery status to
    /// `Processing`. Both writes share one transaction with the status update.
    pub async fn set_status(&self, id: &str, status: ReturnStatus) -> DbResult<ReturnRequest> {
        debug!(id = %id, status = %status.as_str(), "Setting return status");

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE returns SET
                status = ?2,
                updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Return", id));
        }

        if let Some(effect) = order_effect(status) {
            let order_id: String =
                sqlx::query_scalar("SELECT order_id FROM returns WHERE id = ?1")
                    .bind(id)
                    .fetch_one(&mut *tx)
                    .await?;

            if let Some(payment_status) = effect.payment_status() {
                sqlx::query("UPDATE orders SET payment_status = ?2, updated_at = ?3 WHERE id = ?1")
                    .bind(&order_id)
                    .bind(payment_status)
                    .bind(now)
                    .execute(&mut *tx)
                    .await?;
            }

            if let Some(delivery_status) = effect.delivery_status() {
                sqlx::query("UPDATE orders SET delivery_status = ?2, updated_at = ?3 WHERE id = ?1")
                    .bind(&order_id)
                    .bind(delivery_status)
                    .bind(now)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        let updated: ReturnRequest = sqlx::query_as(&format!(
            "SELECT {RETURN_COLUMNS} FROM returns WHERE id = ?1"
        ))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(updated)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::test_support::settle_simple;
    use crate::pool::{Database, DbConfig};
    use verve_core::{DeliveryStatus, PaymentStatus};

    #[tokio::test]
    async fn test_create_requires_order() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db
            .returns()
            .create("missing-order", "never arrived")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_create_copies_buyer_from_order() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let order = settle_simple(&db, "buyer-7", "pay_r1").await;

        let request = db.returns().create(&order.id, "wrong size").await.unwrap();
        assert_eq!(request.buyer_id, "buyer-7");
        assert_eq!(request.status, ReturnStatus::Pending);
        assert_eq!(request.reason, "wrong size");
    }

    #[tokio::test]
    async fn test_duplicate_return_rejected_and_original_untouched() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let order = settle_simple(&db, "buyer-1", "pay_r2").await;

        let original = db.returns().create(&order.id, "first").await.unwrap();
        let err = db.returns().create(&order.id, "second").await.unwrap_err();
        assert!(err.is_unique_violation_on("returns.order_id"));

        let still_there = db
            .returns()
            .get_by_order(&order.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(still_there.id, original.id);
        assert_eq!(still_there.reason, "first");
    }

    #[tokio::test]
    async fn test_refunded_marks_order_payment_refunded() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let order = settle_simple(&db, "buyer-1", "pay_r3").await;
        let request = db.returns().create(&order.id, "damaged").await.unwrap();

        let updated = db
            .returns()
            .set_status(&request.id, ReturnStatus::Refunded)
            .await
            .unwrap();
        assert_eq!(updated.status, ReturnStatus::Refunded);

        let order = db.orders().get_by_id(&order.id).await.unwrap().unwrap();
        assert_eq!(order.payment_status, PaymentStatus::Refunded);
    }

    #[tokio::test]
    async fn test_replaced_resets_order_delivery() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let order = settle_simple(&db, "buyer-1", "pay_r4").await;
        db.orders()
            .set_delivery_status(&order.id, DeliveryStatus::Delivered)
            .await
            .unwrap();

        let request = db.returns().create(&order.id, "defective").await.unwrap();
        db.returns()
            .set_status(&request.id, ReturnStatus::Replaced)
            .await
            .unwrap();

        let order = db.orders().get_by_id(&order.id).await.unwrap().unwrap();
        assert_eq!(order.delivery_status, DeliveryStatus::Processing);
        // Replacement does not touch the money
        assert_eq!(order.payment_status, PaymentStatus::Success);
    }

    #[tokio::test]
    async fn test_approve_has_no_order_side_effect() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let order = settle_simple(&db, "buyer-1", "pay_r5").await;
        let request = db.returns().create(&order.id, "changed mind").await.unwrap();

        db.returns()
            .set_status(&request.id, ReturnStatus::Approved)
            .await
            .unwrap();

        let order = db.orders().get_by_id(&order.id).await.unwrap().unwrap();
        assert_eq!(order.payment_status, PaymentStatus::Success);
        assert_eq!(order.delivery_status, DeliveryStatus::Processing);
    }

    #[tokio::test]
    async fn test_set_status_missing_return() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db
            .returns()
            .set_status("missing", ReturnStatus::Approved)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
