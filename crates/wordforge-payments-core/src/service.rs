//! Payment service - checkout, settlement and failure handling
//!
//! Settlement is idempotent against redelivered processor callbacks: a
//! completion that matches the recorded processor reference is a no-op, a
//! completion with a different reference is a duplicate-settlement anomaly
//! and is never silently resolved.

use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use wordforge_db::{NewPayment, OrderRepository, PaymentRepository, UserRepository};
use wordforge_types::{
    Order, OrderId, Payment, PaymentId, PaymentKind, PaymentState, PaymentStatus, UserId,
};

use crate::config::PaymentsConfig;
use crate::error::PaymentError;
use crate::provider::{CheckoutRequest, PaymentProcessor};
use crate::webhook::{WebhookEventData, WebhookEventType, WebhookHandler};

/// A freshly started payment with its checkout URL
#[derive(Debug, Clone)]
pub struct StartedPayment {
    /// The pending payment record
    pub payment: Payment,
    /// Hosted checkout URL the customer is sent to
    pub checkout_url: String,
}

/// Payment service
///
/// Owns the payment record lifecycle:
/// - `start_payment` creates a pending record with a processor session
/// - `complete_payment` settles it, crediting the balance (top-ups) or
///   marking the order paid (order payments) in the same transaction
/// - `fail_payment` terminates it with no side effects
pub struct PaymentService<P: PaymentRepository, O: OrderRepository, U: UserRepository> {
    payments: Arc<P>,
    orders: Arc<O>,
    users: Arc<U>,
    processor: Arc<dyn PaymentProcessor>,
    webhook: WebhookHandler,
    config: PaymentsConfig,
}

impl<P: PaymentRepository, O: OrderRepository, U: UserRepository> PaymentService<P, O, U> {
    /// Create a new payment service
    pub fn new(
        config: PaymentsConfig,
        payments: Arc<P>,
        orders: Arc<O>,
        users: Arc<U>,
        processor: Arc<dyn PaymentProcessor>,
    ) -> Self {
        Self {
            payments,
            orders,
            users,
            processor,
            webhook: WebhookHandler::new(config.webhook_secret.clone()),
            config,
        }
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Start a payment attempt
    ///
    /// `order_id` is required for order payments and forbidden for top-ups.
    #[instrument(skip(self), fields(user_id = %user_id, kind = %kind, amount_cents))]
    pub async fn start_payment(
        &self,
        user_id: UserId,
        amount_cents: i64,
        kind: PaymentKind,
        order_id: Option<OrderId>,
    ) -> Result<StartedPayment, PaymentError> {
        if amount_cents <= 0 {
            return Err(PaymentError::Validation(
                "amount must be positive".to_string(),
            ));
        }

        let account = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(PaymentError::AccountNotFound)?;

        match kind {
            PaymentKind::TopUp => {
                if order_id.is_some() {
                    return Err(PaymentError::Validation(
                        "top-up must not reference an order".to_string(),
                    ));
                }
            }
            PaymentKind::OrderPayment => {
                let order_id = order_id.ok_or_else(|| {
                    PaymentError::Validation("order payment requires an order".to_string())
                })?;
                let order = self.require_order(order_id).await?;
                if order.user_id != user_id {
                    return Err(PaymentError::Validation(
                        "order belongs to a different account".to_string(),
                    ));
                }
                if order.payment_status == PaymentStatus::Paid {
                    return Err(PaymentError::Validation(
                        "order is already paid".to_string(),
                    ));
                }
            }
        }

        let payment_id = PaymentId::new();
        let session = self
            .processor
            .create_checkout_session(CheckoutRequest {
                customer_email: &account.email,
                amount_cents,
                currency: &self.config.currency,
                reference: &payment_id.to_string(),
                kind,
            })
            .await?;

        let payment = self
            .payments
            .create(NewPayment {
                id: payment_id,
                user_id,
                order_id,
                kind,
                amount_cents,
                processor_session_id: Some(session.session_id.clone()),
                metadata: serde_json::json!({}),
            })
            .await?;

        info!(
            payment_id = %payment.id,
            session_id = %session.session_id,
            "Payment started"
        );

        Ok(StartedPayment {
            payment,
            checkout_url: session.url,
        })
    }

    // =========================================================================
    // Settlement
    // =========================================================================

    /// Complete a payment
    ///
    /// Idempotent: a repeat completion carrying the processor reference
    /// already recorded returns the stored payment unchanged; a different
    /// reference is a [`PaymentError::DuplicateSettlement`].
    ///
    /// On first completion the settlement dual-write runs in one store
    /// transaction: top-ups credit the account balance by exactly
    /// `paid_cents`, order payments mark the related order paid and grow
    /// the account's lifetime spend.
    #[instrument(skip(self), fields(payment_id = %payment_id, paid_cents))]
    pub async fn complete_payment(
        &self,
        payment_id: PaymentId,
        paid_cents: i64,
        processor_ref: &str,
    ) -> Result<Payment, PaymentError> {
        let payment = self.require_payment(payment_id).await?;

        match payment.status {
            PaymentState::Completed => return self.check_idempotent(payment, processor_ref),
            PaymentState::Failed => {
                return Err(PaymentError::InvalidState {
                    status: payment.status,
                })
            }
            PaymentState::Pending => {}
        }

        if paid_cents <= 0 {
            return Err(PaymentError::Validation(
                "paid amount must be positive".to_string(),
            ));
        }
        if paid_cents > payment.amount_cents {
            return Err(PaymentError::Validation(format!(
                "paid amount {paid_cents} exceeds requested amount {}",
                payment.amount_cents
            )));
        }

        let settled = match payment.kind {
            PaymentKind::TopUp => {
                self.payments
                    .settle_top_up(payment_id, payment.user_id, paid_cents, processor_ref)
                    .await?
            }
            PaymentKind::OrderPayment => {
                let order_id = payment.order_id.ok_or_else(|| {
                    PaymentError::Internal("order payment without an order".to_string())
                })?;
                self.payments
                    .settle_order_payment(
                        payment_id,
                        order_id,
                        payment.user_id,
                        paid_cents,
                        processor_ref,
                    )
                    .await?
            }
        };

        if !settled {
            // A concurrent settlement won the pending check; decide from
            // the state it left behind.
            let payment = self.require_payment(payment_id).await?;
            return match payment.status {
                PaymentState::Completed => self.check_idempotent(payment, processor_ref),
                status => Err(PaymentError::InvalidState { status }),
            };
        }

        let payment = self.require_payment(payment_id).await?;
        info!(
            payment_id = %payment.id,
            kind = %payment.kind,
            paid_cents,
            "Payment completed"
        );
        Ok(payment)
    }

    /// Terminally fail a payment; no balance or order mutation
    ///
    /// Failing an already-failed payment is a no-op; failing a completed
    /// one is illegal.
    #[instrument(skip(self), fields(payment_id = %payment_id))]
    pub async fn fail_payment(
        &self,
        payment_id: PaymentId,
        reason: &str,
    ) -> Result<Payment, PaymentError> {
        let payment = self.require_payment(payment_id).await?;

        match payment.status {
            PaymentState::Failed => return Ok(payment),
            PaymentState::Completed => {
                return Err(PaymentError::InvalidState {
                    status: payment.status,
                })
            }
            PaymentState::Pending => {}
        }

        let failed = self.payments.mark_failed(payment_id, reason).await?;
        if !failed {
            let payment = self.require_payment(payment_id).await?;
            return match payment.status {
                PaymentState::Failed => Ok(payment),
                status => Err(PaymentError::InvalidState { status }),
            };
        }

        warn!(payment_id = %payment_id, reason, "Payment failed");
        self.require_payment(payment_id).await
    }

    // =========================================================================
    // Webhooks
    // =========================================================================

    /// Process a verified processor callback
    ///
    /// Completed checkout sessions settle the matching payment; expired
    /// sessions fail it. Unknown event types are acknowledged and ignored.
    #[instrument(skip(self, payload, signature))]
    pub async fn process_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<(), PaymentError> {
        let event = self.webhook.verify_and_parse(payload, signature)?;

        match (&event.event_type, &event.data) {
            (WebhookEventType::CheckoutSessionCompleted, WebhookEventData::Checkout(data)) => {
                let payment = self.require_payment_by_session(&data.session_id).await?;
                let paid_cents = data.amount_paid_cents.unwrap_or(payment.amount_cents);
                let processor_ref = data
                    .processor_ref
                    .clone()
                    .unwrap_or_else(|| data.session_id.clone());

                match self
                    .complete_payment(payment.id, paid_cents, &processor_ref)
                    .await
                {
                    Ok(_) => Ok(()),
                    Err(e @ PaymentError::DuplicateSettlement { .. }) => {
                        // Reconciliation alert: never resolved silently.
                        error!(error = %e, event_id = %event.id, "Duplicate settlement detected");
                        Err(e)
                    }
                    Err(e) => Err(e),
                }
            }
            (WebhookEventType::CheckoutSessionExpired, WebhookEventData::Checkout(data)) => {
                let payment = self.require_payment_by_session(&data.session_id).await?;
                self.fail_payment(payment.id, "checkout session expired")
                    .await?;
                Ok(())
            }
            (WebhookEventType::Unknown(event_type), _) => {
                info!(event_type = %event_type, event_id = %event.id, "Ignoring unknown webhook event");
                Ok(())
            }
            _ => Err(PaymentError::Webhook(
                "event data does not match event type".to_string(),
            )),
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Fetch a payment by ID
    pub async fn get_payment(&self, payment_id: PaymentId) -> Result<Payment, PaymentError> {
        self.require_payment(payment_id).await
    }

    /// List an account's payments, newest first
    pub async fn list_payments(
        &self,
        user_id: UserId,
        limit: i64,
    ) -> Result<Vec<Payment>, PaymentError> {
        Ok(self.payments.list_by_user(user_id, limit.clamp(1, 100)).await?)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn check_idempotent(
        &self,
        payment: Payment,
        processor_ref: &str,
    ) -> Result<Payment, PaymentError> {
        let existing = payment.processor_invoice_id.clone().unwrap_or_default();
        if existing == processor_ref {
            // Redelivered completion; state already applied exactly once.
            return Ok(payment);
        }
        Err(PaymentError::DuplicateSettlement {
            payment_id: payment.id,
            existing,
            incoming: processor_ref.to_string(),
        })
    }

    async fn require_payment(&self, payment_id: PaymentId) -> Result<Payment, PaymentError> {
        self.payments
            .find_by_id(payment_id)
            .await?
            .ok_or(PaymentError::PaymentNotFound)
    }

    async fn require_payment_by_session(&self, session_id: &str) -> Result<Payment, PaymentError> {
        self.payments
            .find_by_session_id(session_id)
            .await?
            .ok_or_else(|| {
                warn!(session_id, "Webhook for unknown checkout session");
                PaymentError::PaymentNotFound
            })
    }

    async fn require_order(&self, order_id: OrderId) -> Result<Order, PaymentError> {
        self.orders
            .find_by_id(order_id)
            .await?
            .ok_or(PaymentError::OrderNotFound)
    }
}

impl<P: PaymentRepository, O: OrderRepository, U: UserRepository> std::fmt::Debug
    for PaymentService<P, O, U>
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentService")
            .field("currency", &self.config.currency)
            .finish_non_exhaustive()
    }
}
