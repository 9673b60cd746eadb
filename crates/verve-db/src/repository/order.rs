//! # Order Repository
//!
//! Reads and status writes for settled orders.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Order Lifecycle                                   │
//! │                                                                         │
//! │  1. CREATED by the settlement transaction (crate::checkout)             │
//! │     └── payment_status: success, delivery_status: Processing            │
//! │                                                                         │
//! │  2. DELIVERY TRANSITIONS (this repository)                              │
//! │     └── set_delivery_status() → Processing / Shipped / Delivered /      │
//! │                                 cancelled, per the active policy        │
//! │                                                                         │
//! │  3. RETURN SIDE EFFECTS (repository::returns, same transaction as the   │
//! │     return status write)                                                │
//! │     └── Refunded → payment_status = refunded                            │
//! │     └── Replaced → delivery_status = Processing                         │
//! │                                                                         │
//! │  Orders are NEVER deleted and the remaining columns never change.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use verve_core::{DeliveryStatus, Order, OrderItem, PaymentStatus};

/// Columns selected for every `Order` read; keep in sync with the struct.
const ORDER_COLUMNS: &str = r#"
    id, buyer_id, address, external_order_ref, external_payment_ref,
    amount_cents, payment_status, delivery_status, created_at, updated_at
"#;

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Gets an order by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let order: Option<Order> =
            sqlx::query_as(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(order)
    }

    /// Gets an order by its external payment reference (the idempotency key).
    pub async fn get_by_payment_ref(&self, payment_ref: &str) -> DbResult<Option<Order>> {
        let order: Option<Order> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE external_payment_ref = ?1"
        ))
        .bind(payment_ref)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Gets all line items for an order.
    pub async fn get_items(&self, order_id: &str) -> DbResult<Vec<OrderItem>> {
        let items: Vec<OrderItem> = sqlx::query_as(
            r#"
            SELECT id, order_id, product_id, name_snapshot, unit_price_cents,
                   quantity, color, size, created_at
            FROM order_items
            WHERE order_id = ?1
            ORDER BY created_at
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists all orders, newest first (admin view).
    pub async fn list_all(&self) -> DbResult<Vec<Order>> {
        let orders: Vec<Order> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Lists a buyer's orders, newest first.
    pub async fn list_by_buyer(&self, buyer_id: &str) -> DbResult<Vec<Order>> {
        let orders: Vec<Order> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE buyer_id = ?1 ORDER BY created_at DESC"
        ))
        .bind(buyer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Sets the delivery status of an order.
    ///
    /// Transition legality is the caller's concern (see
    /// `verve_core::delivery::TransitionPolicy`); this method writes whatever
    /// status it is handed and reports `NotFound` via the affected-row count.
    pub async fn set_delivery_status(
        &self,
        order_id: &str,
        status: DeliveryStatus,
    ) -> DbResult<Order> {
        debug!(order_id = %order_id, status = %status.as_str(), "Setting delivery status");

        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE orders SET
                delivery_status = ?2,
                updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(order_id)
        .bind(status)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", order_id));
        }

        self.get_by_id(order_id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", order_id))
    }

    /// Sets the payment status of an order (admin corrections).
    ///
    /// The return workflow does NOT call this - its order side effects ride
    /// the return-status transaction in `repository::returns`.
    pub async fn set_payment_status(
        &self,
        order_id: &str,
        status: PaymentStatus,
    ) -> DbResult<Order> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE orders SET
                payment_status = ?2,
                updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(order_id)
        .bind(status)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", order_id));
        }

        self.get_by_id(order_id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", order_id))
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

    #[tokio::test]
    async fn test_get_missing_order() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.orders().get_by_id("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_delivery_status() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let order = settle_simple(&db, "buyer-1", "pay_1").await;

        let updated = db
            .orders()
            .set_delivery_status(&order.id, DeliveryStatus::Shipped)
            .await
            .unwrap();
        assert_eq!(updated.delivery_status, DeliveryStatus::Shipped);

        // Status survives a fresh read
        let reread = db.orders().get_by_id(&order.id).await.unwrap().unwrap();
        assert_eq!(reread.delivery_status, DeliveryStatus::Shipped);
    }

    #[tokio::test]
    async fn test_set_delivery_status_missing_order() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db
            .orders()
            .set_delivery_status("nope", DeliveryStatus::Shipped)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_by_buyer_newest_first() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let first = settle_simple(&db, "buyer-1", "pay_1").await;
        let second = settle_simple(&db, "buyer-1", "pay_2").await;
        settle_simple(&db, "buyer-2", "pay_3").await;

        let orders = db.orders().list_by_buyer("buyer-1").await.unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].id, second.id);
        assert_eq!(orders[1].id, first.id);
    }

    #[tokio::test]
    async fn test_set_payment_status() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let order = settle_simple(&db, "buyer-1", "pay_adm").await;

        let updated = db
            .orders()
            .set_payment_status(&order.id, PaymentStatus::Failed)
            .await
            .unwrap();
        assert_eq!(updated.payment_status, PaymentStatus::Failed);
    }

    #[tokio::test]
    async fn test_get_by_payment_ref() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let order = settle_simple(&db, "buyer-1", "pay_find_me").await;

        let found = db
            .orders()
            .get_by_payment_ref("pay_find_me")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, order.id);
        assert!(db
            .orders()
            .get_by_payment_ref("pay_other")
            .await
            .unwrap()
            .is_none());
    }
}
