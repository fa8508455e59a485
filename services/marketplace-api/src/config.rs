//! Configuration for the Marketplace API service.

use std::time::Duration;

use wordforge_orders_core::OrdersConfig;
use wordforge_payments_core::PaymentsConfig;

/// Marketplace API configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub http_port: u16,
    /// Database URL
    pub database_url: String,
    /// Orders core configuration
    pub orders: OrdersConfig,
    /// Payments core configuration
    pub payments: PaymentsConfig,
    /// Administrator bootstrap email, if bootstrap is enabled
    pub admin_email: Option<String>,
    /// Administrator bootstrap password hash
    pub admin_password_hash: Option<String>,
    /// Request timeout
    pub request_timeout: Duration,
    /// Metrics enabled
    pub metrics_enabled: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Database
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        // Server port
        let http_port = std::env::var("HTTP_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("HTTP_PORT"))?;

        // Processor configuration
        let stripe_secret_key = std::env::var("STRIPE_SECRET_KEY")
            .map_err(|_| ConfigError::Missing("STRIPE_SECRET_KEY"))?;

        let stripe_webhook_secret = std::env::var("STRIPE_WEBHOOK_SECRET")
            .map_err(|_| ConfigError::Missing("STRIPE_WEBHOOK_SECRET"))?;

        // Default URLs for checkout redirects
        let success_url = std::env::var("PAYMENTS_SUCCESS_URL")
            .unwrap_or_else(|_| "https://app.example.com/payments/success".to_string());

        let cancel_url = std::env::var("PAYMENTS_CANCEL_URL")
            .unwrap_or_else(|_| "https://app.example.com/payments/cancel".to_string());

        let currency = std::env::var("PAYMENTS_CURRENCY").unwrap_or_else(|_| "usd".to_string());

        // Administrator bootstrap (both variables or neither)
        let admin_email = std::env::var("ADMIN_EMAIL").ok();
        let admin_password_hash = std::env::var("ADMIN_PASSWORD_HASH").ok();
        if admin_email.is_some() != admin_password_hash.is_some() {
            return Err(ConfigError::Invalid("ADMIN_EMAIL / ADMIN_PASSWORD_HASH"));
        }

        // Request timeout
        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("REQUEST_TIMEOUT_SECS"))?;

        // Metrics
        let metrics_enabled = std::env::var("METRICS_ENABLED")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .unwrap_or(true);

        let payments = PaymentsConfig::new(&stripe_secret_key, &stripe_webhook_secret)
            .with_urls(&success_url, &cancel_url)
            .with_currency(&currency);

        Ok(Self {
            http_port,
            database_url,
            orders: OrdersConfig::default(),
            payments,
            admin_email,
            admin_password_hash,
            request_timeout: Duration::from_secs(request_timeout_secs),
            metrics_enabled,
        })
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
