//! # Error Types
//!
//! Domain-specific error types for verve-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  verve-core errors (this file)                                          │
//! │  ├── CoreError        - Business rule violations                        │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  verve-db errors (separate crate)                                       │
//! │  ├── DbError          - Database operation failures                     │
//! │  └── CheckoutError    - Settlement failures (wraps both)                │
//! │                                                                         │
//! │  store-api errors (in app)                                              │
//! │  └── ApiError         - What clients see (HTTP status + JSON)           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CheckoutError → ApiError → client  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product name, order ID, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// They should be caught and translated to user-friendly messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A line item references a product that does not exist.
    ///
    /// ## When This Occurs
    /// - Stale cart referencing a deleted product
    /// - Forged or corrupted product reference
    ///
    /// This is a data integrity problem, not a retryable condition.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Insufficient stock to settle a checkout.
    ///
    /// Carries the *name* of the offending product so the buyer can correct
    /// their cart.
    #[error("{name} is out of stock: available {available}, requested {requested}")]
    InsufficientStock {
        name: String,
        available: i64,
        requested: i64,
    },

    /// Order not found.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Return request not found.
    #[error("Return not found: {0}")]
    ReturnNotFound(String),

    /// A return already exists for this order.
    ///
    /// At most one return request may reference an order.
    #[error("Return already requested for order {order_id}")]
    DuplicateReturn { order_id: String },

    /// A status string is not one of the enumerated values.
    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    /// A status transition rejected by the active transition policy.
    ///
    /// Only produced when the forward-only policy is enabled; the default
    /// permissive policy never yields this.
    #[error("Transition from {from} to {to} is not allowed")]
    InvalidTransition { from: String, to: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when a request doesn't meet basic requirements.
/// Used for early validation before any business logic or I/O runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
