//! # Validation Module
//!
//! Checkout request validation for Verve Commerce.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP deserialization (serde)                                  │
//! │  ├── Type validation (numbers are numbers, etc.)                        │
//! │  └── Unknown/missing JSON fields                                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - required-field and range validation             │
//! │  ├── Runs BEFORE signature verification and BEFORE any transaction      │
//! │  └── A request that fails here causes zero side effects                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                             │
//! │  ├── NOT NULL constraints                                               │
//! │  ├── UNIQUE constraints (payment ref, return per order)                 │
//! │  └── Foreign key constraints                                            │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::CheckoutRequest;
use crate::{MAX_ITEM_QUANTITY, MAX_LINE_ITEMS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates that a string field is present and non-blank.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a charged amount in cents.
///
/// ## Rules
/// - Must be positive (> 0); the gateway never confirms a zero charge
pub fn validate_amount_cents(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }
    Ok(())
}

/// Validates a free-text reason (return requests).
///
/// ## Rules
/// - Must not be empty
/// - Maximum 2000 characters
pub fn validate_reason(reason: &str) -> ValidationResult<()> {
    validate_required("reason", reason)?;

    if reason.len() > 2000 {
        return Err(ValidationError::TooLong {
            field: "reason".to_string(),
            max: 2000,
        });
    }

    Ok(())
}

// =============================================================================
// Checkout Request Validation
// =============================================================================

/// Validates a checkout request before the coordinator touches anything.
///
/// ## Rules
/// - `buyer_id`, `address`, both external references: present and non-blank
/// - `line_items`: non-empty, at most MAX_LINE_ITEMS entries
/// - every line item: product reference present, quantity in range
/// - `amount_cents`: positive
///
/// A request rejected here has opened no transaction and caused no side
/// effects.
pub fn validate_checkout_request(request: &CheckoutRequest) -> ValidationResult<()> {
    validate_required("buyer_id", &request.buyer_id)?;
    validate_required("address", &request.address)?;
    validate_required("external_order_ref", &request.external_order_ref)?;
    validate_required("external_payment_ref", &request.external_payment_ref)?;

    if request.line_items.is_empty() {
        return Err(ValidationError::Required {
            field: "line_items".to_string(),
        });
    }

    if request.line_items.len() > MAX_LINE_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "line_items".to_string(),
            min: 1,
            max: MAX_LINE_ITEMS as i64,
        });
    }

    for item in &request.line_items {
        validate_required("product_id", &item.product_id)?;
        validate_quantity(item.quantity)?;
    }

    validate_amount_cents(request.amount_cents)?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
