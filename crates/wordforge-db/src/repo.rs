//! Repository traits
//!
//! Async repository interfaces for database operations. The traits speak
//! domain types from `wordforge-types`; row mapping stays inside the
//! Postgres implementations.
//!
//! Account balances have no write method here on purpose: the only paths
//! that move `balance_cents` / `total_spent_cents` are the settlement
//! operations on [`PaymentRepository`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use wordforge_types::{
    Account, Attachment, AttachmentLog, BillingProfile, NotificationPrefs, Order, OrderId,
    OrderStatus, Payment, PaymentId, PaymentKind, Role, UserId,
};

use crate::error::DbResult;

/// Account repository trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find an account by ID
    async fn find_by_id(&self, id: UserId) -> DbResult<Option<Account>>;

    /// Find an account by email
    async fn find_by_email(&self, email: &str) -> DbResult<Option<Account>>;

    /// Find any administrator account
    async fn find_admin(&self) -> DbResult<Option<Account>>;

    /// Create a new account
    async fn create(&self, account: CreateAccount) -> DbResult<Account>;

    /// Replace the billing profile
    async fn update_billing_profile(&self, id: UserId, profile: &BillingProfile) -> DbResult<()>;

    /// Replace the notification preferences
    async fn update_notification_prefs(&self, id: UserId, prefs: NotificationPrefs)
        -> DbResult<()>;

    /// Update email verified status
    async fn set_verified(&self, id: UserId, verified: bool) -> DbResult<()>;
}

/// Create account input
#[derive(Debug, Clone)]
pub struct CreateAccount {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Global number sequences
///
/// Order and item numbers come from named counters incremented atomically
/// in the store; numbers are never reused, not even for cancelled orders.
#[async_trait]
pub trait SequenceRepository: Send + Sync {
    /// Allocate the next order number
    async fn next_order_number(&self) -> DbResult<i64>;

    /// Reserve a contiguous block of item numbers, returning the first
    async fn reserve_item_numbers(&self, count: i64) -> DbResult<i64>;
}

/// Order repository trait
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Insert an order with its items; fails with `DbError::Conflict` when
    /// an order or item number is already taken
    async fn create(&self, order: NewOrder) -> DbResult<Order>;

    /// Find an order by ID, with items and attachments
    async fn find_by_id(&self, id: OrderId) -> DbResult<Option<Order>>;

    /// List orders for an account, newest first
    async fn list_by_user(&self, user_id: UserId, limit: i64) -> DbResult<Vec<Order>>;

    /// Compare-and-set status transition; returns false when the current
    /// status was not one of `expected` (a concurrent writer won)
    async fn transition_status(
        &self,
        id: OrderId,
        expected: &[OrderStatus],
        to: OrderStatus,
    ) -> DbResult<bool>;

    /// Complete an order: status transition, actual delivery date and
    /// completion attachments applied in one transaction
    async fn complete(
        &self,
        id: OrderId,
        expected: &[OrderStatus],
        actual_delivery_date: DateTime<Utc>,
        attachments: &[Attachment],
    ) -> DbResult<bool>;

    /// Append an attachment to one of the order's logs
    async fn append_attachment(
        &self,
        id: OrderId,
        log: AttachmentLog,
        attachment: &Attachment,
    ) -> DbResult<()>;

    /// Replace the delivery-log attachment of the same kind (singular
    /// kinds hold one file per order), inserting if none exists
    async fn replace_delivery(&self, id: OrderId, attachment: &Attachment) -> DbResult<()>;

    /// Link the external invoicing-system reference
    async fn set_invoice_ref(&self, id: OrderId, invoice_ref: &str) -> DbResult<()>;
}

/// Create order input
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub id: OrderId,
    pub order_number: i64,
    pub user_id: UserId,
    pub items: Vec<NewOrderItem>,
    pub total_price_cents: i64,
    pub declared_delivery_date: DateTime<Utc>,
}

/// Create order item input
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub item_number: i64,
    pub topic: String,
    pub length_words: i32,
    pub content_type: String,
    pub language: String,
    pub unit_price_cents: i64,
    pub guidelines: Option<String>,
}

/// Payment repository trait
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Create a pending payment
    async fn create(&self, payment: NewPayment) -> DbResult<Payment>;

    /// Find a payment by ID
    async fn find_by_id(&self, id: PaymentId) -> DbResult<Option<Payment>>;

    /// Find a payment by processor checkout session ID
    async fn find_by_session_id(&self, session_id: &str) -> DbResult<Option<Payment>>;

    /// List payments for an account, newest first
    async fn list_by_user(&self, user_id: UserId, limit: i64) -> DbResult<Vec<Payment>>;

    /// Settle a top-up: flip the payment to completed and credit the
    /// account balance by `paid_cents`, atomically. Returns false when the
    /// payment was no longer pending (a concurrent settlement won).
    async fn settle_top_up(
        &self,
        id: PaymentId,
        user_id: UserId,
        paid_cents: i64,
        processor_ref: &str,
    ) -> DbResult<bool>;

    /// Settle an order payment: flip the payment to completed, mark the
    /// order paid and grow the account's lifetime spend, atomically.
    /// Returns false when the payment was no longer pending.
    async fn settle_order_payment(
        &self,
        id: PaymentId,
        order_id: OrderId,
        user_id: UserId,
        paid_cents: i64,
        processor_ref: &str,
    ) -> DbResult<bool>;

    /// Terminally fail a pending payment; no balance or order mutation.
    /// Returns false when the payment was no longer pending.
    async fn mark_failed(&self, id: PaymentId, reason: &str) -> DbResult<bool>;
}

/// Create payment input
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub id: PaymentId,
    pub user_id: UserId,
    pub order_id: Option<OrderId>,
    pub kind: PaymentKind,
    pub amount_cents: i64,
    pub processor_session_id: Option<String>,
    pub metadata: serde_json::Value,
}
