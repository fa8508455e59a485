//! Wordforge Payments Core - Payment business logic
//!
//! Payment records for balance top-ups and order payments, the
//! payment-processor integration, webhook verification and the settlement
//! dual-write (payment flip plus balance/order side effect, atomically).
//!
//! # Example
//!
//! ```rust,ignore
//! use wordforge_payments_core::{PaymentService, PaymentsConfig};
//!
//! let config = PaymentsConfig::new("sk_test_...", "whsec_...");
//! let payments = PaymentService::new(config, payment_repo, order_repo, user_repo, processor);
//!
//! // Start a balance top-up
//! let started = payments
//!     .start_payment(user_id, 20_000, PaymentKind::TopUp, None)
//!     .await?;
//!
//! // Settle it from the processor callback
//! payments.process_webhook(&body, signature).await?;
//! ```

pub mod config;
pub mod error;
pub mod provider;
pub mod service;
pub mod stripe;
pub mod webhook;

pub use config::PaymentsConfig;
pub use error::PaymentError;
pub use provider::{CheckoutRequest, CheckoutSession, PaymentProcessor};
pub use service::{PaymentService, StartedPayment};
pub use stripe::StripeProcessor;
pub use webhook::{CheckoutSessionData, WebhookEvent, WebhookEventData, WebhookEventType, WebhookHandler};
