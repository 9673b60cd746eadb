//! Checkout settlement handler.
//!
//! `POST /checkout/settle` is the write path of the whole system: it turns a
//! gateway payment confirmation into a settled order, or fails with zero
//! side effects.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use verve_core::{CheckoutRequest, LineItem, Order, OrderItem};

/// `POST /checkout/settle` request body.
///
/// Every field defaults so a missing field reads as blank and is rejected by
/// request validation with 400, instead of a deserialization rejection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettleCheckoutBody {
    #[serde(default)]
    pub buyer_ref: String,
    #[serde(default)]
    pub line_items: Vec<LineItemBody>,
    #[serde(default)]
    pub address: String,
    /// Amount charged by the gateway, in cents.
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub external_order_ref: String,
    #[serde(default)]
    pub external_payment_ref: String,
    #[serde(default)]
    pub supplied_signature: String,
}

/// One cart line in the settlement body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemBody {
    #[serde(default)]
    pub product_ref: String,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
}

/// `POST /checkout/settle` response body.
#[derive(Debug, Serialize)]
pub struct SettleCheckoutResponse {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

impl From<SettleCheckoutBody> for CheckoutRequest {
    fn from(body: SettleCheckoutBody) -> Self {
        CheckoutRequest {
            buyer_id: body.buyer_ref,
            line_items: body
                .line_items
                .into_iter()
                .map(|item| LineItem {
                    product_id: item.product_ref,
                    quantity: item.quantity,
                    color: item.color,
                    size: item.size,
                })
                .collect(),
            address: body.address,
            amount_cents: body.amount,
            external_order_ref: body.external_order_ref,
            external_payment_ref: body.external_payment_ref,
            supplied_signature: body.supplied_signature,
        }
    }
}

/// `POST /checkout/settle`
///
/// ## Responses
/// * `200 {order, items}` - settled (or an idempotent replay of a previous
///   settlement)
/// * `400` - invalid request or signature mismatch
/// * `404` - a line item references an unknown product
/// * `409` - insufficient stock, names the offending product
/// * `500` - persistence failure; the whole checkout is safe to retry
pub async fn settle_checkout(
    State(state): State<AppState>,
    Json(body): Json<SettleCheckoutBody>,
) -> ApiResult<Json<SettleCheckoutResponse>> {
    debug!(
        buyer = %body.buyer_ref,
        items = body.line_items.len(),
        "settle_checkout request"
    );

    let settlement = state
        .coordinator
        .settle(CheckoutRequest::from(body))
        .await
        .map_err(ApiError::from)?;

    // Best-effort, after commit; a replay must not re-notify
    if !settlement.replayed {
        state.notifier.settlement_succeeded(&settlement.order);
    }

    Ok(Json(SettleCheckoutResponse {
        order: settlement.order,
        items: settlement.items,
    }))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{seed_product, test_state, verifier};
    use verve_core::{DeliveryStatus, PaymentStatus};

    fn body(product_ref: &str, quantity: i64, payment_ref: &str) -> SettleCheckoutBody {
        let order_ref = format!("order_{payment_ref}");
        SettleCheckoutBody {
            buyer_ref: "buyer-1".to_string(),
            line_items: vec![LineItemBody {
                product_ref: product_ref.to_string(),
                quantity,
                color: None,
                size: None,
            }],
            address: "12 Rose Lane, Pune".to_string(),
            amount: 1999,
            supplied_signature: verifier().sign(&order_ref, payment_ref),
            external_order_ref: order_ref,
            external_payment_ref: payment_ref.to_string(),
        }
    }

    #[tokio::test]
    async fn test_settle_happy_path() {
        let state = test_state().await;
        let product = seed_product(&state, "Vitamin C Serum", 5).await;

        let response = settle_checkout(State(state.clone()), Json(body(&product.id, 2, "pay_h1")))
            .await
            .unwrap();

        assert_eq!(response.0.order.payment_status, PaymentStatus::Success);
        assert_eq!(response.0.order.delivery_status, DeliveryStatus::Processing);
        assert_eq!(response.0.items[0].name_snapshot, "Vitamin C Serum");
        assert_eq!(state.db.products().stock(&product.id).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_settle_missing_fields_is_invalid_request() {
        let state = test_state().await;
        let product = seed_product(&state, "Serum", 5).await;

        let mut b = body(&product.id, 1, "pay_h2");
        b.address = String::new();

        let err = settle_checkout(State(state), Json(b)).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_settle_bad_signature() {
        let state = test_state().await;
        let product = seed_product(&state, "Serum", 5).await;

        let mut b = body(&product.id, 1, "pay_h3");
        b.supplied_signature = "feedface".repeat(8);

        let err = settle_checkout(State(state.clone()), Json(b))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::SignatureMismatch));
        assert_eq!(state.db.products().stock(&product.id).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_settle_insufficient_stock_maps_to_conflict() {
        let state = test_state().await;
        let product = seed_product(&state, "Silk Scarf", 1).await;

        let err = settle_checkout(State(state), Json(body(&product.id, 2, "pay_h4")))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InsufficientStock { name } if name == "Silk Scarf"));
    }

    #[tokio::test]
    async fn test_settle_replay_returns_same_order() {
        let state = test_state().await;
        let product = seed_product(&state, "Serum", 5).await;
        let b = body(&product.id, 1, "pay_h5");

        let first = settle_checkout(State(state.clone()), Json(b.clone()))
            .await
            .unwrap();
        let second = settle_checkout(State(state.clone()), Json(b)).await.unwrap();

        assert_eq!(first.0.order.id, second.0.order.id);
        assert_eq!(state.db.products().stock(&product.id).await.unwrap(), 4);
    }
}
