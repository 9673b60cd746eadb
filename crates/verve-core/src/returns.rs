//! # Return Workflow Rules
//!
//! The return/refund state machine and its effects on the linked order.
//!
//! ## Status Graph
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Return Request Lifecycle                           │
//! │                                                                         │
//! │               ┌─────────┐                                               │
//! │        ┌──────│ Pending │──────┐                                        │
//! │        ▼      └─────────┘      ▼                                        │
//! │  ┌──────────┐            ┌──────────┐                                   │
//! │  │ Approved │            │ Rejected │                                   │
//! │  └────┬─────┘            └──────────┘                                   │
//! │       │                                                                 │
//! │   ┌───┴────┐                                                            │
//! │   ▼        ▼                                                            │
//! │ ┌──────────┐ ┌──────────┐                                               │
//! │ │ Refunded │ │ Replaced │   (terminal)                                  │
//! │ └────┬─────┘ └────┬─────┘                                               │
//! │      │            │                                                     │
//! │      ▼            ▼                                                     │
//! │  order.payment   order.delivery                                         │
//! │  → refunded      → Processing (replacement re-enters fulfillment)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Admin tooling may set any of the five statuses directly (matching how the
//! storefront behaves today); the canonical graph above is advisory and
//! exposed through [`canonical_targets`] for stricter future policies.

use crate::types::{DeliveryStatus, PaymentStatus, ReturnStatus};

/// What a return status transition does to the linked order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderEffect {
    /// Mark the order's payment as refunded.
    MarkRefunded,
    /// Reset the order's delivery status so the replacement ships.
    RestartDelivery,
}

impl OrderEffect {
    /// The payment status this effect writes, if any.
    pub const fn payment_status(&self) -> Option<PaymentStatus> {
        match self {
            OrderEffect::MarkRefunded => Some(PaymentStatus::Refunded),
            OrderEffect::RestartDelivery => None,
        }
    }

    /// The delivery status this effect writes, if any.
    pub const fn delivery_status(&self) -> Option<DeliveryStatus> {
        match self {
            OrderEffect::MarkRefunded => None,
            OrderEffect::RestartDelivery => Some(DeliveryStatus::Processing),
        }
    }
}

/// The order side effect of entering `status`, if any.
///
/// Only the two terminal resolutions touch the order; approval and rejection
/// are internal to the return workflow.
pub const fn order_effect(status: ReturnStatus) -> Option<OrderEffect> {
    match status {
        ReturnStatus::Refunded => Some(OrderEffect::MarkRefunded),
        ReturnStatus::Replaced => Some(OrderEffect::RestartDelivery),
        ReturnStatus::Pending | ReturnStatus::Approved | ReturnStatus::Rejected => None,
    }
}

/// Canonical next statuses from `from` in the advisory graph.
pub const fn canonical_targets(from: ReturnStatus) -> &'static [ReturnStatus] {
    match from {
        ReturnStatus::Pending => &[ReturnStatus::Approved, ReturnStatus::Rejected],
        ReturnStatus::Approved => &[ReturnStatus::Refunded, ReturnStatus::Replaced],
        ReturnStatus::Rejected | ReturnStatus::Refunded | ReturnStatus::Replaced => &[],
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
