//! Error types for the store API.
//!
//! ## Status Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  InvalidRequest / SignatureMismatch / InvalidStatus / DuplicateReturn   │
//! │      → 400 Bad Request                                                  │
//! │  NotFound (order, return, product)                                      │
//! │      → 404 Not Found                                                    │
//! │  InsufficientStock / InvalidTransition                                  │
//! │      → 409 Conflict                                                     │
//! │  Persistence and anything unexpected                                    │
//! │      → 500 Internal Server Error (detail logged, not leaked)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use verve_core::CoreError;
use verve_db::{CheckoutError, DbError};

/// Store API errors, one variant per HTTP-visible failure mode.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid signature")]
    SignatureMismatch,

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Return already requested for this order")]
    DuplicateReturn,

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("{name} is out of stock")]
    InsufficientStock { name: String },

    #[error("Transition from {from} to {to} is not allowed")]
    InvalidTransition { from: String, to: String },

    #[error("Something went wrong")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_)
            | ApiError::SignatureMismatch
            | ApiError::InvalidStatus(_)
            | ApiError::DuplicateReturn => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::InsufficientStock { .. } | ApiError::InvalidTransition { .. } => {
                StatusCode::CONFLICT
            }
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidRequest(_) => "invalid_request",
            ApiError::SignatureMismatch => "signature_mismatch",
            ApiError::InvalidStatus(_) => "invalid_status",
            ApiError::DuplicateReturn => "duplicate_return",
            ApiError::NotFound { .. } => "not_found",
            ApiError::InsufficientStock { .. } => "insufficient_stock",
            ApiError::InvalidTransition { .. } => "invalid_transition",
            ApiError::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            // Full detail stays in the logs; the client gets a generic message
            error!(detail = %detail, "Internal error");
        }

        let body = json!({
            "error": self.code(),
            "message": self.to_string(),
        });

        (self.status(), Json(body)).into_response()
    }
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::InvalidRequest(e) => ApiError::InvalidRequest(e.to_string()),
            CheckoutError::SignatureMismatch => ApiError::SignatureMismatch,
            CheckoutError::ProductNotFound(id) => ApiError::NotFound {
                entity: "Product",
                id,
            },
            CheckoutError::InsufficientStock { name, .. } => ApiError::InsufficientStock { name },
            CheckoutError::Persistence(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::NotFound {
                entity: match entity.as_str() {
                    "Order" => "Order",
                    "Return" => "Return",
                    "Product" => "Product",
                    _ => "Record",
                },
                id,
            },
            // Handlers intercept the unique violations they expect (duplicate
            // returns); anything reaching this far is unexpected
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidTransition { from, to } => ApiError::InvalidTransition { from, to },
            CoreError::InvalidStatus(s) => ApiError::InvalidStatus(s),
            CoreError::OrderNotFound(id) => ApiError::NotFound { entity: "Order", id },
            CoreError::ReturnNotFound(id) => ApiError::NotFound {
                entity: "Return",
                id,
            },
            CoreError::DuplicateReturn { .. } => ApiError::DuplicateReturn,
            CoreError::ProductNotFound(id) => ApiError::NotFound {
                entity: "Product",
                id,
            },
            CoreError::InsufficientStock { name, .. } => ApiError::InsufficientStock { name },
            CoreError::Validation(e) => ApiError::InvalidRequest(e.to_string()),
        }
    }
}

/// Result type for handler functions.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::InvalidRequest("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::SignatureMismatch.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::DuplicateReturn.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::NotFound {
                entity: "Order",
                id: "o1".into()
            }
            .status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::InsufficientStock {
                name: "Serum".into()
            }
            .status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Internal("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_checkout_error_conversion() {
        let api: ApiError = CheckoutError::SignatureMismatch.into();
        assert!(matches!(api, ApiError::SignatureMismatch));

        let api: ApiError = CheckoutError::InsufficientStock {
            name: "Silk Scarf".into(),
            available: 0,
            requested: 1,
        }
        .into();
        assert!(matches!(api, ApiError::InsufficientStock { name } if name == "Silk Scarf"));
    }

    #[test]
    fn test_internal_error_message_is_generic() {
        let err = ApiError::Internal("sqlite disk I/O error at offset 42".into());
        assert_eq!(err.to_string(), "Something went wrong");
    }
}
