//! Payments configuration

/// Payment service configuration
#[derive(Debug, Clone)]
pub struct PaymentsConfig {
    /// Processor secret key
    pub secret_key: String,
    /// Processor webhook signing secret
    pub webhook_secret: String,
    /// Default success URL for checkout
    pub success_url: String,
    /// Default cancel URL for checkout
    pub cancel_url: String,
    /// ISO currency code for checkout sessions
    pub currency: String,
}

impl PaymentsConfig {
    /// Create a new payments config
    pub fn new(secret_key: impl Into<String>, webhook_secret: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            webhook_secret: webhook_secret.into(),
            success_url: "https://app.example.com/payments/success".to_string(),
            cancel_url: "https://app.example.com/payments/cancel".to_string(),
            currency: "usd".to_string(),
        }
    }

    /// Set checkout redirect URLs
    pub fn with_urls(mut self, success_url: impl Into<String>, cancel_url: impl Into<String>) -> Self {
        self.success_url = success_url.into();
        self.cancel_url = cancel_url.into();
        self
    }

    /// Set the checkout currency
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }
}
