//! Payment errors

use thiserror::Error;
use wordforge_types::{PaymentId, PaymentState};

/// Payment errors
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Malformed or missing input; reported to the caller, never retried
    #[error("validation error: {0}")]
    Validation(String),

    /// Payment not found
    #[error("payment not found")]
    PaymentNotFound,

    /// Related order not found
    #[error("order not found")]
    OrderNotFound,

    /// Account not found
    #[error("account not found")]
    AccountNotFound,

    /// Operation illegal for the payment's current state
    #[error("operation not allowed while payment is {status}")]
    InvalidState {
        /// Current payment state
        status: PaymentState,
    },

    /// A completion arrived carrying a different processor reference than
    /// the one already settled; surfaced as a reconciliation alert
    #[error("duplicate settlement on payment {payment_id}: settled with {existing}, got {incoming}")]
    DuplicateSettlement {
        /// The affected payment
        payment_id: PaymentId,
        /// Reference recorded at settlement
        existing: String,
        /// Reference the second completion carried
        incoming: String,
    },

    /// Payment provider error
    #[error("provider error: {0}")]
    Provider(String),

    /// Webhook verification or processing error
    #[error("webhook error: {0}")]
    Webhook(String),

    /// Database error
    #[error("database error: {0}")]
    Database(#[from] wordforge_db::DbError),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl PaymentError {
    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::PaymentNotFound | Self::OrderNotFound | Self::AccountNotFound
        )
    }

    /// Check if this is a provider-side failure
    pub fn is_provider_error(&self) -> bool {
        matches!(self, Self::Provider(_))
    }
}
