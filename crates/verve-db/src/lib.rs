//! # verve-db: Database Layer for Verve Commerce
//!
//! SQLite persistence for the order & fulfillment lifecycle engine.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          verve-db                                       │
//! │                                                                         │
//! │  Database (pool.rs)                                                     │
//! │   ├── products()  → ProductRepository    catalog reads, stock reads    │
//! │   ├── orders()    → OrderRepository      order reads, status writes    │
//! │   ├── returns()   → ReturnRepository     return workflow + side        │
//! │   │                                      effects, one transaction      │
//! │   ├── notifications() → NotificationRepository   best-effort rows      │
//! │   └── checkout(verifier) → CheckoutCoordinator                         │
//! │                             the settlement transaction:                │
//! │                             verify → decrement stock → insert order    │
//! │                             (all-or-nothing)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All SQL lives in this crate. The API layer never writes queries.

pub mod checkout;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use checkout::{CheckoutCoordinator, CheckoutError, Settlement};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::notification::NotificationRepository;
pub use repository::order::OrderRepository;
pub use repository::product::ProductRepository;
pub use repository::returns::ReturnRepository;
