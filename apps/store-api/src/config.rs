//! Store API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! development defaults.

use serde::{Deserialize, Serialize};
use std::env;

use verve_core::TransitionPolicy;

/// Store API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// HTTP server port
    pub http_port: u16,

    /// SQLite database path
    pub database_path: String,

    /// Shared secret for payment confirmation signatures.
    /// In production this MUST be set via PAYMENT_SECRET.
    pub payment_secret: String,

    /// When true, delivery status transitions must follow the forward-only
    /// graph; when false (default), any transition is accepted.
    pub delivery_forward_only: bool,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ApiConfig {
            http_port: env::var("HTTP_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("HTTP_PORT".to_string()))?,

            database_path: env::var("DATABASE_PATH").unwrap_or_else(|_| "./verve.db".to_string()),

            payment_secret: env::var("PAYMENT_SECRET").unwrap_or_else(|_| {
                // Development fallback only; production deployments set the
                // real gateway secret via environment
                "verve-dev-secret-change-in-production".to_string()
            }),

            delivery_forward_only: env::var("DELIVERY_FORWARD_ONLY")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
        };

        if config.payment_secret.trim().is_empty() {
            return Err(ConfigError::MissingRequired("PAYMENT_SECRET".to_string()));
        }

        Ok(config)
    }

    /// The delivery transition policy selected by this configuration.
    pub fn transition_policy(&self) -> TransitionPolicy {
        if self.delivery_forward_only {
            TransitionPolicy::ForwardOnly
        } else {
            TransitionPolicy::Permissive
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
