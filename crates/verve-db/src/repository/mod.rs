//! # Repository Module
//!
//! Database repository implementations for Verve Commerce.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.   │
//! │                                                                         │
//! │  API handler                                                            │
//! │       │                                                                 │
//! │       │  db.orders().list_by_buyer("buyer-1")                           │
//! │       ▼                                                                 │
//! │  OrderRepository                                                        │
//! │  ├── get_by_id(&self, id)                                               │
//! │  ├── list_by_buyer(&self, buyer_id)                                     │
//! │  └── set_delivery_status(&self, id, status)                             │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • SQL is isolated in one place                                         │
//! │  • Clean separation of concerns                                         │
//! │  • Multi-statement workflows (return side effects) stay transactional   │
//! │    behind one method call                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Catalog reads, stock reads, seed inserts
//! - [`order::OrderRepository`] - Order reads and status writes
//! - [`returns::ReturnRepository`] - Return workflow with order side effects
//! - [`notification::NotificationRepository`] - Best-effort notification rows
//!
//! The settlement transaction itself lives in [`crate::checkout`], not here:
//! it spans products, orders, and order_items in one atomic unit and is the
//! only writer allowed to decrement stock.

pub mod notification;
pub mod order;
pub mod product;
pub mod returns;
