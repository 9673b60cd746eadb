//! # Payment Signature Verification
//!
//! Verifies that an inbound payment confirmation genuinely came from the
//! payment gateway, before anything else happens.
//!
//! ## Verification Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Payment Confirmation Verification                     │
//! │                                                                         │
//! │  Gateway callback: { order_ref, payment_ref, signature }                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  message  = order_ref + "|" + payment_ref                              │
//! │  expected = HMAC-SHA256(shared_secret, message)                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  hex-decode(signature)  ──── invalid hex ───►  false                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  constant-time compare(expected, supplied)                             │
//! │       │                                                                 │
//! │       ├── equal      → true  (proceed to settlement)                   │
//! │       └── different  → false (authentication failure, NO side effects) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Contract
//! `verify` returns `false` on any mismatch and never errors. The caller must
//! treat `false` as an authentication failure, not a data error, and must not
//! touch inventory or orders before this check passes.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Verifies gateway payment confirmations against a pre-shared secret.
#[derive(Clone)]
pub struct PaymentVerifier {
    secret: Vec<u8>,
}

impl std::fmt::Debug for PaymentVerifier {
    // Never print the secret, not even in debug logs.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentVerifier").finish_non_exhaustive()
    }
}

impl PaymentVerifier {
    /// Creates a verifier with the given pre-shared secret.
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        PaymentVerifier {
            secret: secret.into(),
        }
    }

    /// Verifies a payment confirmation signature.
    ///
    /// Computes HMAC-SHA256 over `order_ref|payment_ref` and compares it in
    /// constant time against the supplied hex signature.
    ///
    /// ## Returns
    /// * `true` - the confirmation was signed with the shared secret
    /// * `false` - wrong signature, malformed hex, wrong length. Never panics,
    ///   never errors.
    pub fn verify(&self, order_ref: &str, payment_ref: &str, supplied_signature: &str) -> bool {
        let expected = match self.compute(order_ref, payment_ref) {
            Some(bytes) => bytes,
            None => return false,
        };

        let supplied = match hex::decode(supplied_signature.trim()) {
            Ok(bytes) => bytes,
            Err(_) => return false,
        };

        if supplied.len() != expected.len() {
            return false;
        }

        expected.ct_eq(supplied.as_slice()).into()
    }

    /// Computes the expected signature as a lowercase hex string.
    ///
    /// Exposed for test fixtures and for signing outbound webhooks; the
    /// verification path goes through [`Self::verify`].
    pub fn sign(&self, order_ref: &str, payment_ref: &str) -> String {
        self.compute(order_ref, payment_ref)
            .map(hex::encode)
            .unwrap_or_default()
    }

    fn compute(&self, order_ref: &str, payment_ref: &str) -> Option<Vec<u8>> {
        // HMAC accepts keys of any length; new_from_slice only fails for
        // fixed-size MACs.
        let mut mac = match HmacSha256::new_from_slice(&self.secret) {
            Ok(mac) => mac,
            Err(_) => return None,
        };
        mac.update(order_ref.as_bytes());
        mac.update(b"|");
        mac.update(payment_ref.as_bytes());
        Some(mac.finalize().into_bytes().to_vec())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
