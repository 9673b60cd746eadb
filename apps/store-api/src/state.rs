//! Shared application state.
//!
//! One `AppState` is built at startup and cloned into every handler by axum.
//! All members are cheap to clone (pool handles and small structs).

use verve_core::TransitionPolicy;
use verve_db::{CheckoutCoordinator, Database};

use crate::notify::Notifier;

/// State shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database handle (repositories hang off this).
    pub db: Database,
    /// The settlement coordinator, bound to the gateway verifier.
    pub coordinator: CheckoutCoordinator,
    /// Best-effort notification writer.
    pub notifier: Notifier,
    /// Delivery transition policy selected by configuration.
    pub policy: TransitionPolicy,
}
