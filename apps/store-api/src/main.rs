//! # Verve Store API
//!
//! HTTP server exposing the order & fulfillment lifecycle engine.
//!
//! ## Endpoints
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          REST Surface                                   │
//! │                                                                         │
//! │  POST   /checkout/settle           settle a verified payment            │
//! │  PATCH  /orders/{id}/status        delivery state machine               │
//! │  GET    /orders                    admin listing                        │
//! │  GET    /orders/buyer/{buyer_id}   buyer's history                      │
//! │  POST   /returns                   create a return request              │
//! │  PATCH  /returns/{id}/status       return workflow                      │
//! │  GET    /returns                   admin listing                        │
//! │  GET    /products                  catalog reads                        │
//! │  GET    /products/{id}                                                  │
//! │  GET    /health                    liveness + DB reachability           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod handlers;
mod notify;
mod state;

use std::net::SocketAddr;

use axum::routing::{get, patch, post};
use axum::Router;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::ApiConfig;
use crate::notify::Notifier;
use crate::state::AppState;
use verve_core::PaymentVerifier;
use verve_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing; RUST_LOG overrides the default filter
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("Starting Verve store API...");

    // Load configuration
    let config = ApiConfig::load()?;
    info!(
        port = config.http_port,
        db_path = %config.database_path,
        forward_only = config.delivery_forward_only,
        "Configuration loaded"
    );

    // Connect to database; migrations run on connect
    let db = Database::new(DbConfig::new(&config.database_path)).await?;
    info!("Connected to SQLite");

    let verifier = PaymentVerifier::new(config.payment_secret.clone());
    let state = AppState {
        coordinator: db.checkout(verifier),
        notifier: Notifier::new(db.notifications()),
        policy: config.transition_policy(),
        db,
    };

    let app = router(state);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.http_port).parse()?;
    info!(%addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Builds the application router.
fn router(state: AppState) -> Router {
    Router::new()
        .route("/checkout/settle", post(handlers::checkout::settle_checkout))
        .route("/orders", get(handlers::orders::list_orders))
        .route(
            "/orders/buyer/{buyer_id}",
            get(handlers::orders::list_buyer_orders),
        )
        .route(
            "/orders/{id}/status",
            patch(handlers::orders::update_order_status),
        )
        .route(
            "/returns",
            post(handlers::returns::create_return).get(handlers::returns::list_returns),
        )
        .route(
            "/returns/{id}/status",
            patch(handlers::returns::update_return_status),
        )
        .route("/products", get(handlers::products::list_products))
        .route("/products/{id}", get(handlers::products::get_product))
        .route("/health", get(handlers::health::health))
        .with_state(state)
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
