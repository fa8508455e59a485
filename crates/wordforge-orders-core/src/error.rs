//! Order errors

use thiserror::Error;
use wordforge_types::OrderStatus;

/// Order errors
#[derive(Error, Debug)]
pub enum OrderError {
    /// Malformed or missing input; reported to the caller, never retried
    #[error("validation error: {0}")]
    Validation(String),

    /// Operation illegal for the order's current lifecycle state
    #[error("operation not allowed while order is {status}")]
    InvalidState {
        /// Current order status
        status: OrderStatus,
    },

    /// Order not found
    #[error("order not found")]
    OrderNotFound,

    /// Account not found
    #[error("account not found")]
    AccountNotFound,

    /// Number allocation kept colliding after the configured retries
    #[error("order number allocation conflict")]
    Conflict,

    /// Database error
    #[error("database error: {0}")]
    Database(#[from] wordforge_db::DbError),
}

impl OrderError {
    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::OrderNotFound | Self::AccountNotFound)
    }

    /// Check if this is a caller error (bad input or illegal transition)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::InvalidState { .. } | Self::OrderNotFound | Self::AccountNotFound
        )
    }
}
