//! Account errors

use thiserror::Error;

/// Account errors
#[derive(Error, Debug)]
pub enum AccountError {
    /// Email does not look like an address
    #[error("invalid email: {0}")]
    InvalidEmail(String),

    /// An account with this email already exists
    #[error("email already registered")]
    EmailTaken,

    /// Account not found
    #[error("account not found")]
    NotFound,

    /// Database error
    #[error("database error: {0}")]
    Database(#[from] wordforge_db::DbError),
}

impl AccountError {
    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}
