//! Return workflow handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use verve_core::validation::validate_reason;
use verve_core::{ReturnRequest, ReturnStatus};

/// `POST /returns` request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReturnBody {
    #[serde(default)]
    pub order_id: String,
    #[serde(default)]
    pub reason: String,
}

/// `PATCH /returns/{id}/status` request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReturnStatusBody {
    #[serde(default)]
    pub target_status: String,
}

/// Single-return response.
#[derive(Debug, Serialize)]
pub struct ReturnResponse {
    #[serde(rename = "returnRequest")]
    pub return_request: ReturnRequest,
}

/// Return-list response.
#[derive(Debug, Serialize)]
pub struct ReturnListResponse {
    pub count: usize,
    pub returns: Vec<ReturnRequest>,
}

/// `POST /returns`
///
/// ## Responses
/// * `201 {returnRequest}` - created, status `Pending`
/// * `400` - blank/overlong reason, or a return already exists for the order
/// * `404` - no such order
pub async fn create_return(
    State(state): State<AppState>,
    Json(body): Json<CreateReturnBody>,
) -> ApiResult<(StatusCode, Json<ReturnResponse>)> {
    debug!(order_id = %body.order_id, "create_return request");

    if body.order_id.trim().is_empty() {
        return Err(ApiError::InvalidRequest("orderId is required".to_string()));
    }
    validate_reason(&body.reason).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

    let request = state
        .db
        .returns()
        .create(&body.order_id, &body.reason)
        .await
        .map_err(|err| {
            if err.is_unique_violation_on("returns.order_id") {
                ApiError::DuplicateReturn
            } else {
                ApiError::from(err)
            }
        })?;

    state.notifier.return_requested(&request.order_id);

    Ok((
        StatusCode::CREATED,
        Json(ReturnResponse {
            return_request: request,
        }),
    ))
}

/// `PATCH /returns/{id}/status`
///
/// Sets the return's status; reaching `Refunded` or `Replaced` also applies
/// the order side effect in the same transaction.
///
/// ## Responses
/// * `200 {returnRequest}` - updated
/// * `400` - target is not one of the five return statuses
/// * `404` - no such return request
pub async fn update_return_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateReturnStatusBody>,
) -> ApiResult<Json<ReturnResponse>> {
    debug!(return_id = %id, target = %body.target_status, "update_return_status request");

    let target = ReturnStatus::parse(&body.target_status)
        .ok_or_else(|| ApiError::InvalidStatus(body.target_status.clone()))?;

    let request = state.db.returns().set_status(&id, target).await?;

    Ok(Json(ReturnResponse {
        return_request: request,
    }))
}

/// `GET /returns` - all return requests, newest first (admin view).
pub async fn list_returns(State(state): State<AppState>) -> ApiResult<Json<ReturnListResponse>> {
    let returns = state.db.returns().list_all().await?;
    Ok(Json(ReturnListResponse {
        count: returns.len(),
        returns,
    }))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::checkout::{settle_checkout, LineItemBody, SettleCheckoutBody};
    use crate::handlers::test_support::{seed_product, test_state, verifier};
    use verve_core::{DeliveryStatus, Order, PaymentStatus};

    async fn settle_one(state: &AppState, payment_ref: &str) -> Order {
        let product = seed_product(state, "Serum", 5).await;
        let order_ref = format!("order_{payment_ref}");
        let body = SettleCheckoutBody {
            buyer_ref: "buyer-1".to_string(),
            line_items: vec![LineItemBody {
                product_ref: product.id.clone(),
                quantity: 1,
                color: None,
                size: None,
            }],
            address: "12 Rose Lane, Pune".to_string(),
            amount: 1999,
            supplied_signature: verifier().sign(&order_ref, payment_ref),
            external_order_ref: order_ref,
            external_payment_ref: payment_ref.to_string(),
        };
        settle_checkout(State(state.clone()), Json(body))
            .await
            .unwrap()
            .0
            .order
    }

    #[tokio::test]
    async fn test_create_return_happy_path() {
        let state = test_state().await;
        let order = settle_one(&state, "pay_t1").await;

        let (status, response) = create_return(
            State(state),
            Json(CreateReturnBody {
                order_id: order.id.clone(),
                reason: "arrived damaged".to_string(),
            }),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(response.0.return_request.order_id, order.id);
        assert_eq!(response.0.return_request.status, ReturnStatus::Pending);
    }

    #[tokio::test]
    async fn test_create_return_unknown_order_is_404() {
        let state = test_state().await;
        let err = create_return(
            State(state),
            Json(CreateReturnBody {
                order_id: "missing".to_string(),
                reason: "whatever".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::NotFound { entity: "Order", .. }));
    }

    #[tokio::test]
    async fn test_duplicate_return_is_400() {
        let state = test_state().await;
        let order = settle_one(&state, "pay_t2").await;

        create_return(
            State(state.clone()),
            Json(CreateReturnBody {
                order_id: order.id.clone(),
                reason: "first".to_string(),
            }),
        )
        .await
        .unwrap();

        let err = create_return(
            State(state),
            Json(CreateReturnBody {
                order_id: order.id,
                reason: "second".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::DuplicateReturn));
    }

    #[tokio::test]
    async fn test_blank_reason_is_400() {
        let state = test_state().await;
        let order = settle_one(&state, "pay_t3").await;

        let err = create_return(
            State(state),
            Json(CreateReturnBody {
                order_id: order.id,
                reason: "   ".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_refund_flow_updates_order() {
        let state = test_state().await;
        let order = settle_one(&state, "pay_t4").await;
        let (_, created) = create_return(
            State(state.clone()),
            Json(CreateReturnBody {
                order_id: order.id.clone(),
                reason: "damaged".to_string(),
            }),
        )
        .await
        .unwrap();

        let response = update_return_status(
            State(state.clone()),
            Path(created.0.return_request.id.clone()),
            Json(UpdateReturnStatusBody {
                target_status: "Refunded".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(response.0.return_request.status, ReturnStatus::Refunded);

        let order = state.db.orders().get_by_id(&order.id).await.unwrap().unwrap();
        assert_eq!(order.payment_status, PaymentStatus::Refunded);
    }

    #[tokio::test]
    async fn test_replace_flow_resets_delivery() {
        let state = test_state().await;
        let order = settle_one(&state, "pay_t5").await;
        state
            .db
            .orders()
            .set_delivery_status(&order.id, DeliveryStatus::Delivered)
            .await
            .unwrap();

        let (_, created) = create_return(
            State(state.clone()),
            Json(CreateReturnBody {
                order_id: order.id.clone(),
                reason: "defective".to_string(),
            }),
        )
        .await
        .unwrap();

        update_return_status(
            State(state.clone()),
            Path(created.0.return_request.id),
            Json(UpdateReturnStatusBody {
                target_status: "Replaced".to_string(),
            }),
        )
        .await
        .unwrap();

        let order = state.db.orders().get_by_id(&order.id).await.unwrap().unwrap();
        assert_eq!(order.delivery_status, DeliveryStatus::Processing);
    }

    #[tokio::test]
    async fn test_invalid_status_value_is_400() {
        let state = test_state().await;
        let err = update_return_status(
            State(state),
            Path("any".to_string()),
            Json(UpdateReturnStatusBody {
                target_status: "Recycled".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::InvalidStatus(s) if s == "Recycled"));
    }

    #[tokio::test]
    async fn test_unknown_return_is_404() {
        let state = test_state().await;
        let err = update_return_status(
            State(state),
            Path("missing".to_string()),
            Json(UpdateReturnStatusBody {
                target_status: "Approved".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::NotFound { entity: "Return", .. }));
    }
}
