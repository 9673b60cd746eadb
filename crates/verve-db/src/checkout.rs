//! # Checkout Transaction Coordinator
//!
//! The settlement path: reconciles an external payment confirmation with
//! inventory state and creates the order record, exactly once.
//!
//! ## Settlement Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        settle(request)                                  │
//! │                                                                         │
//! │  1. Validate fields        ── fail → InvalidRequest  (no transaction)   │
//! │  2. Verify HMAC signature  ── fail → SignatureMismatch (no transaction) │
//! │  3. Replay check on external_payment_ref                                │
//! │        └── already settled → return the ORIGINAL order (idempotent)     │
//! │  4. BEGIN                                                               │
//! │  5.   per line item:                                                    │
//! │         UPDATE products SET stock = stock - qty                         │
//! │         WHERE id = ? AND stock >= qty                                   │
//! │         └── 0 rows → ProductNotFound | InsufficientStock, ROLLBACK ALL  │
//! │  6.   INSERT order (payment_status = success)                           │
//! │         └── UNIQUE(external_payment_ref) hit → lost a replay race:      │
//! │             ROLLBACK (decrements undone), return the original order     │
//! │  7.   INSERT order items (name/price snapshots read inside the tx)      │
//! │  8. COMMIT                 ── fail → PersistenceFailure, nothing durable │
//! │  9. Caller emits best-effort notification (outside the transaction)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! The conditional decrement is the FIRST statement of the transaction, so a
//! settlement is a writer from its first step. SQLite admits one writer at a
//! time; a contending settlement waits on the busy timeout, then re-evaluates
//! `stock >= qty` against the committed value. Two checkouts racing for the
//! last unit therefore resolve to exactly one winner, with no application
//! locks and no retry loop.
//!
//! No reader can ever observe the order without its stock decrements or the
//! decrements without the order: both become visible at COMMIT or not at all.

use chrono::Utc;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::DbError;
use crate::repository::order::OrderRepository;
use verve_core::validation::validate_checkout_request;
use verve_core::{
    CheckoutRequest, DeliveryStatus, Money, Order, OrderItem, PaymentStatus, PaymentVerifier,
    ValidationError,
};

// =============================================================================
// Errors
// =============================================================================

/// Why a settlement did not produce a new order.
///
/// Every variant except `Persistence` is deterministic for a given request
/// and store state; `Persistence` is the one callers may retry, because the
/// transaction guarantees nothing partial was committed.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Required fields missing or out of range. Caller error, no retry.
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] ValidationError),

    /// The supplied signature does not match the shared-secret HMAC.
    /// Authentication failure - never retried, logged as a security event.
    #[error("Payment signature mismatch")]
    SignatureMismatch,

    /// A line item references a product that does not exist.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// A product cannot cover the requested quantity. Carries the product
    /// *name* so the buyer knows what to remove from the cart.
    #[error("{name} is out of stock: available {available}, requested {requested}")]
    InsufficientStock {
        name: String,
        available: i64,
        requested: i64,
    },

    /// Transient storage failure. The whole checkout is safe to retry.
    #[error("Persistence failure: {0}")]
    Persistence(#[from] DbError),
}

impl From<sqlx::Error> for CheckoutError {
    fn from(err: sqlx::Error) -> Self {
        CheckoutError::Persistence(DbError::from(err))
    }
}

// =============================================================================
// Settlement
// =============================================================================

/// The outcome of a successful settlement.
#[derive(Debug, Clone)]
pub struct Settlement {
    pub order: Order,
    pub items: Vec<OrderItem>,
    /// True when this confirmation had already been settled and the original
    /// order is being returned instead of a new one. Replays must not
    /// re-notify the buyer.
    pub replayed: bool,
}

// =============================================================================
// Coordinator
// =============================================================================

/// Orchestrates payment verification, inventory reservation, and order
/// creation as one atomic unit.
#[derive(Debug, Clone)]
pub struct CheckoutCoordinator {
    pool: SqlitePool,
    verifier: PaymentVerifier,
}

impl CheckoutCoordinator {
    /// Creates a coordinator over the given pool and verifier.
    pub fn new(pool: SqlitePool, verifier: PaymentVerifier) -> Self {
        CheckoutCoordinator { pool, verifier }
    }

    /// Settles a verified checkout.
    ///
    /// See the module docs for the full algorithm. On success the order and
    /// its stock decrements are durable together; on any error, neither is.
    pub async fn settle(&self, request: CheckoutRequest) -> Result<Settlement, CheckoutError> {
        // Step 1: field validation. Nothing has been opened yet.
        validate_checkout_request(&request)?;

        // Step 2: authenticity. Must fail BEFORE any inventory or order
        // mutation is attempted.
        if !self.verifier.verify(
            &request.external_order_ref,
            &request.external_payment_ref,
            &request.supplied_signature,
        ) {
            warn!(
                order_ref = %request.external_order_ref,
                "Payment signature mismatch - possible forged or corrupted confirmation"
            );
            return Err(CheckoutError::SignatureMismatch);
        }

        // Step 3: replay fast path. A gateway retry of an already-settled
        // confirmation gets the original order back without touching stock.
        if let Some(existing) = self
            .orders()
            .get_by_payment_ref(&request.external_payment_ref)
            .await?
        {
            info!(
                order_id = %existing.id,
                payment_ref = %request.external_payment_ref,
                "Replayed payment confirmation - returning original order"
            );
            let items = self.orders().get_items(&existing.id).await?;
            return Ok(Settlement {
                order: existing,
                items,
                replayed: true,
            });
        }

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        // Steps 4-5: reserve stock for every line item. The conditional
        // UPDATE is both the existence check and the stock check; a miss is
        // classified afterwards. Dropping `tx` on the error paths rolls back
        // every decrement made so far.
        let mut snapshots: Vec<(String, i64)> = Vec::with_capacity(request.line_items.len());

        for item in &request.line_items {
            let result = sqlx::query(
                r#"
                UPDATE products
                SET stock = stock - ?2, updated_at = ?3
                WHERE id = ?1 AND stock >= ?2
                "#,
            )
            .bind(&item.product_id)
            .bind(item.quantity)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                let product: Option<(String, i64)> =
                    sqlx::query_as("SELECT name, stock FROM products WHERE id = ?1")
                        .bind(&item.product_id)
                        .fetch_optional(&mut *tx)
                        .await?;

                return Err(match product {
                    None => CheckoutError::ProductNotFound(item.product_id.clone()),
                    Some((name, available)) => CheckoutError::InsufficientStock {
                        name,
                        available,
                        requested: item.quantity,
                    },
                });
            }

            // Snapshot name and price inside the same transaction the
            // decrement happened in.
            let snapshot: (String, i64) =
                sqlx::query_as("SELECT name, price_cents FROM products WHERE id = ?1")
                    .bind(&item.product_id)
                    .fetch_one(&mut *tx)
                    .await?;
            snapshots.push(snapshot);
        }

        // Step 6: insert the order.
        let order = Order {
            id: Uuid::new_v4().to_string(),
            buyer_id: request.buyer_id.clone(),
            address: request.address.clone(),
            external_order_ref: request.external_order_ref.clone(),
            external_payment_ref: request.external_payment_ref.clone(),
            amount_cents: request.amount_cents,
            payment_status: PaymentStatus::Success,
            delivery_status: DeliveryStatus::Processing,
            created_at: now,
            updated_at: now,
        };

        let inserted = sqlx::query(
            r#"
            INSERT INTO orders (
                id, buyer_id, address, external_order_ref, external_payment_ref,
                amount_cents, payment_status, delivery_status,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&order.id)
        .bind(&order.buyer_id)
        .bind(&order.address)
        .bind(&order.external_order_ref)
        .bind(&order.external_payment_ref)
        .bind(order.amount_cents)
        .bind(order.payment_status)
        .bind(order.delivery_status)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut *tx)
        .await;

        if let Err(err) = inserted {
            let db_err = DbError::from(err);
            if db_err.is_unique_violation_on("orders.external_payment_ref") {
                // Lost a replay race after the fast-path check: another
                // settlement of the same confirmation committed first. Undo
                // our decrements and hand back the original order.
                tx.rollback().await?;
                return self.already_settled(&request.external_payment_ref).await;
            }
            return Err(CheckoutError::Persistence(db_err));
        }

        // Step 7: line items, frozen at settlement-time name and price.
        let mut items = Vec::with_capacity(request.line_items.len());
        for (line, (name, price_cents)) in request.line_items.iter().zip(snapshots) {
            let item = OrderItem {
                id: Uuid::new_v4().to_string(),
                order_id: order.id.clone(),
                product_id: line.product_id.clone(),
                name_snapshot: name,
                unit_price_cents: price_cents,
                quantity: line.quantity,
                color: line.color.clone(),
                size: line.size.clone(),
                created_at: now,
            };

            sqlx::query(
                r#"
                INSERT INTO order_items (
                    id, order_id, product_id, name_snapshot, unit_price_cents,
                    quantity, color, size, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
            )
            .bind(&item.id)
            .bind(&item.order_id)
            .bind(&item.product_id)
            .bind(&item.name_snapshot)
            .bind(item.unit_price_cents)
            .bind(item.quantity)
            .bind(&item.color)
            .bind(&item.size)
            .bind(item.created_at)
            .execute(&mut *tx)
            .await?;

            items.push(item);
        }

        // Step 8: commit. A failure here leaves nothing durable.
        tx.commit().await?;

        info!(
            order_id = %order.id,
            buyer_id = %order.buyer_id,
            amount = %Money::from_cents(order.amount_cents),
            items = items.len(),
            "Checkout settled"
        );

        Ok(Settlement {
            order,
            items,
            replayed: false,
        })
    }

    /// Loads the original settlement for a replayed confirmation.
    async fn already_settled(&self, payment_ref: &str) -> Result<Settlement, CheckoutError> {
        let order = self
            .orders()
            .get_by_payment_ref(payment_ref)
            .await?
            .ok_or_else(|| {
                // The unique index fired, so the row must exist.
                CheckoutError::Persistence(DbError::not_found("Order", payment_ref))
            })?;
        let items = self.orders().get_items(&order.id).await?;

        Ok(Settlement {
            order,
            items,
            replayed: true,
        })
    }

    fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.pool.clone())
    }
}

// =============================================================================
// Test Support
// =============================================================================

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::pool::Database;
    use verve_core::{LineItem, Product};

    pub(crate) const TEST_SECRET: &str = "test-gateway-secret";

    pub(crate) fn verifier() -> PaymentVerifier {
        PaymentVerifier::new(TEST_SECRET)
    }

    pub(crate) async fn insert_product(
        db: &Database,
        name: &str,
        price_cents: i64,
        stock: i64,
    ) -> Product {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: None,
            price_cents,
            stock,
            product_type: None,
            image_url: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&product).await.unwrap();
        product
    }

    /// A correctly signed single-item checkout request.
    pub(crate) fn signed_request(
        buyer_id: &str,
        product_id: &str,
        quantity: i64,
        payment_ref: &str,
    ) -> CheckoutRequest {
        let order_ref = format!("order_{payment_ref}");
        let signature = verifier().sign(&order_ref, payment_ref);
        CheckoutRequest {
            buyer_id: buyer_id.to_string(),
            line_items: vec![LineItem {
                product_id: product_id.to_string(),
                quantity,
                color: None,
                size: None,
            }],
            address: "12 Rose Lane, Pune".to_string(),
            amount_cents: 2599,
            external_order_ref: order_ref,
            external_payment_ref: payment_ref.to_string(),
            supplied_signature: signature,
        }
    }

    /// Seeds a product and settles a one-item checkout against it.
    pub(crate) async fn settle_simple(db: &Database, buyer_id: &str, payment_ref: &str) -> Order {
        let product = insert_product(db, "Rose Lip Balm", 1299, 5).await;
        let request = signed_request(buyer_id, &product.id, 1, payment_ref);
        db.checkout(verifier())
            .settle(request)
            .await
            .unwrap()
            .order
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
