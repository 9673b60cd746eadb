//! Request handlers, one module per resource.
//!
//! Handlers stay thin: decode the body, call into verve-db / verve-core, map
//! errors through `crate::error::ApiError`. No SQL, no business rules here.

pub mod checkout;
pub mod health;
pub mod orders;
pub mod products;
pub mod returns;

// =============================================================================
// Test Support
// =============================================================================

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::Utc;
    use uuid::Uuid;

    use crate::notify::Notifier;
    use crate::state::AppState;
    use verve_core::{PaymentVerifier, Product, TransitionPolicy};
    use verve_db::{Database, DbConfig};

    pub(crate) const TEST_SECRET: &str = "test-gateway-secret";

    pub(crate) fn verifier() -> PaymentVerifier {
        PaymentVerifier::new(TEST_SECRET)
    }

    /// A full application state over a fresh in-memory database.
    pub(crate) async fn test_state() -> AppState {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        AppState {
            coordinator: db.checkout(verifier()),
            notifier: Notifier::new(db.notifications()),
            policy: TransitionPolicy::Permissive,
            db,
        }
    }

    pub(crate) async fn seed_product(state: &AppState, name: &str, stock: i64) -> Product {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: None,
            price_cents: 1999,
            stock,
            product_type: Some("Beauty".to_string()),
            image_url: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        state.db.products().insert(&product).await.unwrap();
        product
    }
}
