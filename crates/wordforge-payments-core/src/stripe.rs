//! Stripe payment provider implementation

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use wordforge_types::PaymentKind;

use crate::config::PaymentsConfig;
use crate::error::PaymentError;
use crate::provider::{CheckoutRequest, CheckoutSession, PaymentProcessor};

const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

/// Stripe payment provider
#[derive(Clone)]
pub struct StripeProcessor {
    client: Client,
    config: PaymentsConfig,
}

impl StripeProcessor {
    /// Create a new Stripe provider
    pub fn new(config: PaymentsConfig) -> Self {
        let client = Client::new();
        Self { client, config }
    }

    /// Make authenticated request to Stripe
    async fn stripe_request<T: for<'de> Deserialize<'de>>(
        &self,
        method: reqwest::Method,
        endpoint: &str,
        form: Option<&[(&str, &str)]>,
    ) -> Result<T, PaymentError> {
        let url = format!("{STRIPE_API_BASE}{endpoint}");

        let mut request = self
            .client
            .request(method, &url)
            .basic_auth(&self.config.secret_key, Option::<&str>::None);

        if let Some(form_data) = form {
            request = request.form(form_data);
        }

        let response = request.send().await.map_err(|e| {
            error!(error = %e, "Stripe API request failed");
            PaymentError::Provider(e.to_string())
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Stripe API error");
            return Err(PaymentError::Provider(format!("Stripe API error: {status}")));
        }

        response.json::<T>().await.map_err(|e| {
            error!(error = %e, "Failed to parse Stripe response");
            PaymentError::Internal(e.to_string())
        })
    }

    /// Get a checkout session
    #[instrument(skip(self))]
    pub async fn get_checkout_session(
        &self,
        session_id: &str,
    ) -> Result<StripeCheckoutSession, PaymentError> {
        debug!(session_id = %session_id, "Getting checkout session");

        self.stripe_request::<StripeCheckoutSession>(
            reqwest::Method::GET,
            &format!("/checkout/sessions/{session_id}"),
            None,
        )
        .await
    }
}

#[async_trait]
impl PaymentProcessor for StripeProcessor {
    #[instrument(skip(self, request), fields(reference = %request.reference, amount_cents = request.amount_cents))]
    async fn create_checkout_session(
        &self,
        request: CheckoutRequest<'_>,
    ) -> Result<CheckoutSession, PaymentError> {
        debug!("Creating checkout session");

        let amount = request.amount_cents.to_string();
        let product_name = match request.kind {
            PaymentKind::TopUp => "Account balance top-up",
            PaymentKind::OrderPayment => "Content order",
        };

        let form = [
            ("mode", "payment"),
            ("customer_email", request.customer_email),
            ("client_reference_id", request.reference),
            ("success_url", self.config.success_url.as_str()),
            ("cancel_url", self.config.cancel_url.as_str()),
            ("line_items[0][price_data][currency]", self.config.currency.as_str()),
            ("line_items[0][price_data][unit_amount]", amount.as_str()),
            ("line_items[0][price_data][product_data][name]", product_name),
            ("line_items[0][quantity]", "1"),
        ];

        let session: StripeCheckoutSession = self
            .stripe_request(reqwest::Method::POST, "/checkout/sessions", Some(&form))
            .await?;

        Ok(CheckoutSession {
            session_id: session.id,
            url: session.url.unwrap_or_default(),
        })
    }
}

// Stripe API response types

/// Stripe checkout session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeCheckoutSession {
    /// Session ID
    pub id: String,
    /// Checkout URL
    pub url: Option<String>,
    /// Our reference, echoed back
    pub client_reference_id: Option<String>,
    /// Payment intent ID (after completion)
    pub payment_intent: Option<String>,
    /// Total amount in minor units
    pub amount_total: Option<i64>,
    /// Session status
    pub status: Option<String>,
}
