//! Wordforge Types - Shared domain types
//!
//! This crate contains domain types used across Wordforge services:
//! - Account identity, roles and billing profile
//! - Orders, order items and attachment bookkeeping
//! - Payment records and settlement status

pub mod account;
pub mod attachment;
pub mod order;
pub mod payment;

pub use account::*;
pub use attachment::*;
pub use order::*;
pub use payment::*;
