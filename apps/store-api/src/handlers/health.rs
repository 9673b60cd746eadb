//! Liveness endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::state::AppState;

/// `GET /health` - liveness plus database reachability.
///
/// Returns `200` when the database answers, `503` otherwise, so load
/// balancers can rotate a wedged instance out.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let database_up = state.db.health_check().await;

    let status = if database_up {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if database_up { "ok" } else { "degraded" },
            "database": database_up,
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::test_state;

    #[tokio::test]
    async fn test_health_reports_ok() {
        let state = test_state().await;
        let response = health(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
