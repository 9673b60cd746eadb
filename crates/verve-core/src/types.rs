//! # Domain Types
//!
//! Core domain types used throughout Verve Commerce.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │     Order       │   │  ReturnRequest  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  name           │   │  buyer_id       │   │  order_id (FK)  │       │
//! │  │  price_cents    │   │  amount_cents   │   │  reason         │       │
//! │  │  stock          │   │  2× status      │   │  status         │       │
//! │  └─────────────────┘   └────────┬────────┘   └─────────────────┘       │
//! │                                 │ owns                                  │
//! │                        ┌────────▼────────┐                              │
//! │                        │   OrderItem     │   price/name frozen at       │
//! │                        │  (snapshot)     │   settlement time            │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Status Fields
//! An order carries two independent status fields: `payment_status` (what the
//! money did) and `delivery_status` (what the parcel did). Returns mutate
//! both as side effects of their own transitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Payment Status
// =============================================================================

/// What happened to the money behind an order.
///
/// Stored as lowercase text (`success` / `refunded` / `failed`), matching the
/// payment gateway's vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Payment confirmed and settled.
    Success,
    /// Payment returned to the buyer via the return workflow.
    Refunded,
    /// Payment did not complete.
    Failed,
}

// =============================================================================
// Delivery Status
// =============================================================================

/// Where the parcel is in its life.
///
/// The canonical forward path is `Processing → Shipped → Delivered`, with
/// `cancelled` reachable from `Processing` or `Shipped`. Whether non-forward
/// transitions are rejected is a policy decision, see [`crate::delivery`].
///
/// The on-wire spelling of the cancelled state is lowercase; the other three
/// are capitalized. This is a wire-format compatibility constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
pub enum DeliveryStatus {
    Processing,
    Shipped,
    Delivered,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "cancelled"))]
    #[serde(rename = "cancelled")]
    Cancelled,
}

impl DeliveryStatus {
    /// Parses a wire-format status string.
    ///
    /// Returns `None` for anything outside the four known values, including
    /// case mismatches - the wire spelling is exact.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Processing" => Some(DeliveryStatus::Processing),
            "Shipped" => Some(DeliveryStatus::Shipped),
            "Delivered" => Some(DeliveryStatus::Delivered),
            "cancelled" => Some(DeliveryStatus::Cancelled),
            _ => None,
        }
    }

    /// The wire-format spelling of this status.
    pub const fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Processing => "Processing",
            DeliveryStatus::Shipped => "Shipped",
            DeliveryStatus::Delivered => "Delivered",
            DeliveryStatus::Cancelled => "cancelled",
        }
    }
}

impl Default for DeliveryStatus {
    fn default() -> Self {
        DeliveryStatus::Processing
    }
}

// =============================================================================
// Return Status
// =============================================================================

/// The status of a return request.
///
/// Canonical graph: `Pending → {Approved, Rejected}`,
/// `Approved → {Refunded, Replaced}` (terminal). See [`crate::returns`] for
/// the transition table and the order side effects of `Refunded`/`Replaced`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
pub enum ReturnStatus {
    Pending,
    Approved,
    Rejected,
    Refunded,
    Replaced,
}

impl ReturnStatus {
    /// Parses a wire-format status string.
    ///
    /// Anything outside the five enumerated values is an `InvalidStatus`
    /// condition for the caller.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Pending" => Some(ReturnStatus::Pending),
            "Approved" => Some(ReturnStatus::Approved),
            "Rejected" => Some(ReturnStatus::Rejected),
            "Refunded" => Some(ReturnStatus::Refunded),
            "Replaced" => Some(ReturnStatus::Replaced),
            _ => None,
        }
    }

    /// The wire-format spelling of this status.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ReturnStatus::Pending => "Pending",
            ReturnStatus::Approved => "Approved",
            ReturnStatus::Rejected => "Rejected",
            ReturnStatus::Refunded => "Refunded",
            ReturnStatus::Replaced => "Replaced",
        }
    }
}

impl Default for ReturnStatus {
    fn default() -> Self {
        ReturnStatus::Pending
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
///
/// `stock` is mutated only by the inventory decrement inside a committed
/// settlement transaction; it never goes below zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown in the storefront and on order lines.
    pub name: String,

    /// Optional longer description.
    pub description: Option<String>,

    /// Price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Units currently available. Invariant: `stock >= 0`.
    pub stock: i64,

    /// Storefront category ("Beauty", "Fashion", ...).
    pub product_type: Option<String>,

    /// Image URL for the storefront.
    pub image_url: Option<String>,

    /// Whether product is active (soft delete).
    pub is_active: bool,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks whether `quantity` units could be reserved right now.
    ///
    /// Advisory only - the authoritative check is the conditional decrement
    /// inside the settlement transaction.
    pub fn can_reserve(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }
}

// =============================================================================
// Order
// =============================================================================

/// The immutable record of a settled purchase.
///
/// Created exactly once per successful checkout. Only the two status fields
/// ever change after creation: `delivery_status` through the delivery state
/// machine, `payment_status`/`delivery_status` through return side effects.
/// Orders are never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    pub id: String,

    /// Buyer identity, resolved by the auth collaborator and trusted as-is.
    pub buyer_id: String,

    /// Free-text shipping address, captured at checkout.
    pub address: String,

    /// Order reference issued by the payment gateway.
    pub external_order_ref: String,

    /// Payment reference issued by the payment gateway.
    /// UNIQUE in storage - this is the settlement idempotency key.
    pub external_payment_ref: String,

    /// Amount charged, in cents.
    pub amount_cents: i64,

    pub payment_status: PaymentStatus,
    pub delivery_status: DeliveryStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Returns the charged amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Order Item
// =============================================================================

/// A line item in an order.
/// Uses snapshot pattern to freeze product data at settlement time, so later
/// catalog changes never affect historical orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    /// Product name at settlement time (frozen).
    pub name_snapshot: String,
    /// Unit price in cents at settlement time (frozen).
    pub unit_price_cents: i64,
    /// Quantity purchased.
    pub quantity: i64,
    /// Variant attribute: color, if the product has variants.
    pub color: Option<String>,
    /// Variant attribute: size, if the product has variants.
    pub size: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl OrderItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line total (unit price × quantity) as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Return Request
// =============================================================================

/// A buyer's request to return a settled order.
///
/// Holds a non-owning reference to exactly one order; at most one return may
/// exist per order. Created by buyer action, mutated only by admin decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ReturnRequest {
    pub id: String,
    pub order_id: String,
    pub buyer_id: String,
    /// Free-text reason supplied by the buyer.
    pub reason: String,
    pub status: ReturnStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Checkout Request
// =============================================================================

/// One product/quantity entry within a checkout request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: String,
    pub quantity: i64,
    /// Variant attribute chosen by the buyer.
    pub color: Option<String>,
    /// Variant attribute chosen by the buyer.
    pub size: Option<String>,
}

/// Everything the checkout coordinator needs to settle a purchase.
///
/// Assembled by the API layer from the gateway callback body; the
/// `buyer_id` is attached by the auth collaborator and trusted here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub buyer_id: String,
    pub line_items: Vec<LineItem>,
    pub address: String,
    /// Amount the gateway charged, in cents.
    pub amount_cents: i64,
    pub external_order_ref: String,
    pub external_payment_ref: String,
    /// Hex HMAC signature supplied by the gateway callback.
    pub supplied_signature: String,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_status_parse_round_trip() {
        for s in ["Processing", "Shipped", "Delivered", "cancelled"] {
            let parsed = DeliveryStatus::parse(s).unwrap();
            assert_eq!(parsed.as_str(), s);
        }
    }

    #[test]
    fn test_delivery_status_parse_rejects_unknown() {
        assert!(DeliveryStatus::parse("Cancelled").is_none()); // wrong case
        assert!(DeliveryStatus::parse("shipped").is_none());
        assert!(DeliveryStatus::parse("InTransit").is_none());
        assert!(DeliveryStatus::parse("").is_none());
    }

    #[test]
    fn test_return_status_parse_round_trip() {
        for s in ["Pending", "Approved", "Rejected", "Refunded", "Replaced"] {
            let parsed = ReturnStatus::parse(s).unwrap();
            assert_eq!(parsed.as_str(), s);
        }
    }

    #[test]
    fn test_return_status_parse_rejects_unknown() {
        assert!(ReturnStatus::parse("pending").is_none());
        assert!(ReturnStatus::parse("Accepted").is_none());
    }

    #[test]
    fn test_statuses_default() {
        assert_eq!(DeliveryStatus::default(), DeliveryStatus::Processing);
        assert_eq!(ReturnStatus::default(), ReturnStatus::Pending);
    }

    #[test]
    fn test_order_item_line_total() {
        let item = OrderItem {
            id: "i1".to_string(),
            order_id: "o1".to_string(),
            product_id: "p1".to_string(),
            name_snapshot: "Sneakers".to_string(),
            unit_price_cents: 2599,
            quantity: 3,
            color: Some("white".to_string()),
            size: Some("42".to_string()),
            created_at: Utc::now(),
        };
        assert_eq!(item.line_total().cents(), 7797);
    }

    #[test]
    fn test_product_can_reserve() {
        let product = Product {
            id: "p1".to_string(),
            name: "Lip Balm".to_string(),
            description: None,
            price_cents: 499,
            stock: 2,
            product_type: Some("Beauty".to_string()),
            image_url: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(product.can_reserve(1));
        assert!(product.can_reserve(2));
        assert!(!product.can_reserve(3));
    }
}
