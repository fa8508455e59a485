//! Payment provider abstraction

use async_trait::async_trait;

use wordforge_types::PaymentKind;

use crate::PaymentError;

/// Checkout session returned by the processor
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    /// Processor session ID
    pub session_id: String,
    /// Hosted checkout URL
    pub url: String,
}

/// Checkout session request
#[derive(Debug, Clone)]
pub struct CheckoutRequest<'a> {
    /// Customer email for the processor receipt
    pub customer_email: &'a str,
    /// Requested amount in minor currency units
    pub amount_cents: i64,
    /// ISO currency code
    pub currency: &'a str,
    /// Our payment ID, echoed back in processor callbacks
    pub reference: &'a str,
    /// What the payment settles
    pub kind: PaymentKind,
}

/// Payment provider trait
///
/// Abstracts payment processing to allow different providers (Stripe, etc.)
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Create a checkout session
    async fn create_checkout_session(
        &self,
        request: CheckoutRequest<'_>,
    ) -> Result<CheckoutSession, PaymentError>;
}
