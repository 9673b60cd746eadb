//! # Delivery Status Transitions
//!
//! The post-settlement delivery state machine.
//!
//! ## Transition Graph
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Delivery Status Transitions                           │
//! │                                                                         │
//! │   ┌────────────┐      ┌─────────┐      ┌───────────┐                    │
//! │   │ Processing │─────►│ Shipped │─────►│ Delivered │                    │
//! │   └─────┬──────┘      └────┬────┘      └───────────┘                    │
//! │         │                  │                                            │
//! │         └────────┬─────────┘                                            │
//! │                  ▼                                                      │
//! │           ┌───────────┐                                                 │
//! │           │ cancelled │                                                 │
//! │           └───────────┘                                                 │
//! │                                                                         │
//! │  Permissive policy (default): ANY status may move to ANY other.        │
//! │  ForwardOnly policy: only the arrows above are legal.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The storefront's admin tooling historically moved orders between arbitrary
//! statuses (re-opening a delivered order, un-cancelling), so the permissive
//! policy is the default. Stores that want the strict graph opt into
//! [`TransitionPolicy::ForwardOnly`] through configuration.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::DeliveryStatus;

/// Legal forward edges of the delivery graph.
const FORWARD_EDGES: &[(DeliveryStatus, DeliveryStatus)] = &[
    (DeliveryStatus::Processing, DeliveryStatus::Shipped),
    (DeliveryStatus::Shipped, DeliveryStatus::Delivered),
    (DeliveryStatus::Processing, DeliveryStatus::Cancelled),
    (DeliveryStatus::Shipped, DeliveryStatus::Cancelled),
];

/// Which delivery status transitions are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionPolicy {
    /// Any status may move to any other status.
    Permissive,
    /// Only forward edges (and cancellation before delivery) are legal.
    ForwardOnly,
}

impl Default for TransitionPolicy {
    fn default() -> Self {
        TransitionPolicy::Permissive
    }
}

impl TransitionPolicy {
    /// Checks whether moving `from → to` is allowed under this policy.
    ///
    /// Self-transitions are allowed under both policies; re-asserting the
    /// current status is a no-op, not an error.
    pub fn allows(&self, from: DeliveryStatus, to: DeliveryStatus) -> bool {
        match self {
            TransitionPolicy::Permissive => true,
            TransitionPolicy::ForwardOnly => {
                from == to || FORWARD_EDGES.contains(&(from, to))
            }
        }
    }

    /// Validates a transition, returning `InvalidTransition` when rejected.
    pub fn check(&self, from: DeliveryStatus, to: DeliveryStatus) -> CoreResult<()> {
        if self.allows(from, to) {
            Ok(())
        } else {
            Err(CoreError::InvalidTransition {
                from: from.as_str().to_string(),
                to: to.as_str().to_string(),
            })
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use DeliveryStatus::*;

    #[test]
    fn test_permissive_allows_everything() {
        let policy = TransitionPolicy::Permissive;
        for from in [Processing, Shipped, Delivered, Cancelled] {
            for to in [Processing, Shipped, Delivered, Cancelled] {
                assert!(policy.allows(from, to), "{from:?} -> {to:?}");
            }
        }
    }

    #[test]
    fn test_forward_only_accepts_forward_path() {
        let policy = TransitionPolicy::ForwardOnly;
        assert!(policy.allows(Processing, Shipped));
        assert!(policy.allows(Shipped, Delivered));
        assert!(policy.allows(Processing, Cancelled));
        assert!(policy.allows(Shipped, Cancelled));
    }

    #[test]
    fn test_forward_only_rejects_backward_and_terminal_moves() {
        let policy = TransitionPolicy::ForwardOnly;
        assert!(!policy.allows(Shipped, Processing));
        assert!(!policy.allows(Delivered, Shipped));
        assert!(!policy.allows(Delivered, Cancelled));
        assert!(!policy.allows(Cancelled, Processing));
        assert!(!policy.allows(Processing, Delivered)); // no skipping
    }

    #[test]
    fn test_self_transition_is_noop_under_both() {
        for policy in [TransitionPolicy::Permissive, TransitionPolicy::ForwardOnly] {
            for status in [Processing, Shipped, Delivered, Cancelled] {
                assert!(policy.allows(status, status));
            }
        }
    }

    #[test]
    fn test_check_reports_offending_pair() {
        let err = TransitionPolicy::ForwardOnly
            .check(Delivered, Processing)
            .unwrap_err();
        match err {
            CoreError::InvalidTransition { from, to } => {
                assert_eq!(from, "Delivered");
                assert_eq!(to, "Processing");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_default_policy_is_permissive() {
        assert_eq!(TransitionPolicy::default(), TransitionPolicy::Permissive);
    }
}
