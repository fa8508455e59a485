//! Wordforge Accounts Core - Account management
//!
//! Registration, the idempotent administrator bootstrap, billing profiles
//! and notification preferences.
//!
//! Balances are deliberately absent from this crate's surface: the only
//! write paths for `balance_cents` and `total_spent_cents` live in payment
//! settlement.

pub mod error;
pub mod service;

pub use error::AccountError;
pub use service::AccountService;
