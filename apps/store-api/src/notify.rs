//! Fire-and-forget notifications.
//!
//! Notification writes are explicitly outside the settlement consistency
//! boundary (they happen after commit, on a spawned task) and their failure
//! must never affect the caller's response. They are logged and dropped.

use tracing::warn;

use verve_core::{Money, Order};
use verve_db::repository::notification::NotificationKind;
use verve_db::NotificationRepository;

/// Best-effort notification writer.
#[derive(Clone)]
pub struct Notifier {
    repo: NotificationRepository,
}

impl Notifier {
    /// Creates a notifier over the notification repository.
    pub fn new(repo: NotificationRepository) -> Self {
        Notifier { repo }
    }

    /// Announces a successful settlement to the buyer.
    ///
    /// Spawned so the HTTP response never waits on it; an insert failure is
    /// logged at `warn` and swallowed.
    pub fn settlement_succeeded(&self, order: &Order) {
        let repo = self.repo.clone();
        let message = format!(
            "Your payment of {} was successful.",
            Money::from_cents(order.amount_cents)
        );
        let order_id = order.id.clone();

        tokio::spawn(async move {
            if let Err(err) = repo.insert(&message, NotificationKind::User).await {
                warn!(order_id = %order_id, %err, "Failed to write settlement notification");
            }
        });
    }

    /// Announces a new return request to admin tooling.
    pub fn return_requested(&self, order_id: &str) {
        let repo = self.repo.clone();
        let message = format!("A return was requested for order {order_id}.");
        let order_id = order_id.to_string();

        tokio::spawn(async move {
            if let Err(err) = repo.insert(&message, NotificationKind::Admin).await {
                warn!(order_id = %order_id, %err, "Failed to write return notification");
            }
        });
    }
}
