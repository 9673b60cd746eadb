//! Order handlers: delivery status transitions and order reads.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use verve_core::{DeliveryStatus, Order};

/// `PATCH /orders/{id}/status` request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderStatusBody {
    #[serde(default)]
    pub target_status: String,
}

/// Single-order response.
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub order: Order,
}

/// Order-list response.
#[derive(Debug, Serialize)]
pub struct OrderListResponse {
    pub orders: Vec<Order>,
}

/// `PATCH /orders/{id}/status`
///
/// Moves an order through the delivery state machine. Transition legality is
/// governed by the configured policy: permissive by default, forward-only
/// when `DELIVERY_FORWARD_ONLY` is set.
///
/// ## Responses
/// * `200 {order}` - status updated
/// * `400` - target status is not one of the four delivery statuses
/// * `404` - no such order
/// * `409` - transition rejected by the forward-only policy
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateOrderStatusBody>,
) -> ApiResult<Json<OrderResponse>> {
    debug!(order_id = %id, target = %body.target_status, "update_order_status request");

    let target = DeliveryStatus::parse(&body.target_status)
        .ok_or_else(|| ApiError::InvalidStatus(body.target_status.clone()))?;

    let order = state
        .db
        .orders()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            entity: "Order",
            id: id.clone(),
        })?;

    state.policy.check(order.delivery_status, target)?;

    let order = state.db.orders().set_delivery_status(&id, target).await?;

    Ok(Json(OrderResponse { order }))
}

/// `GET /orders` - all orders, newest first (admin view).
pub async fn list_orders(State(state): State<AppState>) -> ApiResult<Json<OrderListResponse>> {
    let orders = state.db.orders().list_all().await?;
    Ok(Json(OrderListResponse { orders }))
}

/// `GET /orders/buyer/{buyer_id}` - a buyer's orders, newest first.
pub async fn list_buyer_orders(
    State(state): State<AppState>,
    Path(buyer_id): Path<String>,
) -> ApiResult<Json<OrderListResponse>> {
    let orders = state.db.orders().list_by_buyer(&buyer_id).await?;
    Ok(Json(OrderListResponse { orders }))
}

// =============================================================================
// Unit Tests
// =============================================================================
