//! Mock repositories and processor for testing
//!
//! The payment mock applies the settlement dual-write under one lock, the
//! way the Postgres repository applies it in one transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use wordforge_db::{
    CreateAccount, DbError, DbResult, NewOrder, NewPayment, OrderRepository, PaymentRepository,
    UserRepository,
};
use wordforge_payments_core::{
    CheckoutRequest, CheckoutSession, PaymentError, PaymentProcessor,
};
use wordforge_types::{
    Account, Attachment, AttachmentLog, BillingProfile, NotificationPrefs, Order, OrderId,
    OrderStatus, Payment, PaymentId, PaymentState, PaymentStatus, UserId,
};

/// In-memory account repository for testing
#[derive(Default, Clone)]
pub struct MockUserRepository {
    accounts: Arc<DashMap<Uuid, Account>>,
    by_email: Arc<DashMap<String, Uuid>>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a test account directly
    pub fn insert_account(&self, account: Account) {
        self.by_email.insert(account.email.clone(), account.id.0);
        self.accounts.insert(account.id.0, account);
    }

    /// Create a test account with the given role
    pub fn create_test_account(role: &str) -> Account {
        Account {
            id: UserId::new(),
            email: format!("test-{}@example.com", Uuid::new_v4()),
            password_hash: "$argon2id$test".to_string(),
            role: role.parse().unwrap(),
            verified: true,
            balance_cents: 0,
            total_spent_cents: 0,
            billing: BillingProfile::default(),
            notifications: NotificationPrefs::default(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    /// Fetch an account without going through the trait
    pub fn find_by_id_direct(&self, id: UserId) -> Account {
        self.accounts.get(&id.0).expect("account exists").value().clone()
    }

    fn credit_balance(&self, id: UserId, cents: i64) {
        if let Some(mut account) = self.accounts.get_mut(&id.0) {
            account.balance_cents += cents;
            account.updated_at = Utc::now();
        }
    }

    fn add_spend(&self, id: UserId, cents: i64) {
        if let Some(mut account) = self.accounts.get_mut(&id.0) {
            account.total_spent_cents += cents;
            account.updated_at = Utc::now();
        }
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_by_id(&self, id: UserId) -> DbResult<Option<Account>> {
        Ok(self.accounts.get(&id.0).map(|r| r.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> DbResult<Option<Account>> {
        Ok(self
            .by_email
            .get(email)
            .and_then(|id| self.accounts.get(id.value()).map(|r| r.value().clone())))
    }

    async fn find_admin(&self) -> DbResult<Option<Account>> {
        Ok(self
            .accounts
            .iter()
            .filter(|r| r.value().is_admin())
            .min_by_key(|r| r.value().created_at)
            .map(|r| r.value().clone()))
    }

    async fn create(&self, account: CreateAccount) -> DbResult<Account> {
        if self.by_email.contains_key(&account.email) {
            return Err(DbError::Conflict);
        }
        let row = Account {
            id: account.id,
            email: account.email,
            password_hash: account.password_hash,
            role: account.role,
            verified: false,
            balance_cents: 0,
            total_spent_cents: 0,
            billing: BillingProfile::default(),
            notifications: NotificationPrefs::default(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.insert_account(row.clone());
        Ok(row)
    }

    async fn update_billing_profile(&self, id: UserId, profile: &BillingProfile) -> DbResult<()> {
        if let Some(mut account) = self.accounts.get_mut(&id.0) {
            account.billing = profile.clone();
        }
        Ok(())
    }

    async fn update_notification_prefs(
        &self,
        id: UserId,
        prefs: NotificationPrefs,
    ) -> DbResult<()> {
        if let Some(mut account) = self.accounts.get_mut(&id.0) {
            account.notifications = prefs;
        }
        Ok(())
    }

    async fn set_verified(&self, id: UserId, verified: bool) -> DbResult<()> {
        if let Some(mut account) = self.accounts.get_mut(&id.0) {
            account.verified = verified;
        }
        Ok(())
    }
}

/// In-memory order repository for testing
#[derive(Default, Clone)]
pub struct MockOrderRepository {
    orders: Arc<DashMap<Uuid, Order>>,
    seed_counter: Arc<AtomicI64>,
}

impl MockOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a test order directly
    pub fn insert_order(&self, order: Order) {
        self.orders.insert(order.id.0, order);
    }

    /// Allocate a number for seeded fixtures
    pub fn next_seed_number(&self) -> i64 {
        self.seed_counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Fetch an order without going through the trait
    pub fn find_by_id_direct(&self, id: OrderId) -> Order {
        self.orders.get(&id.0).expect("order exists").value().clone()
    }

    fn set_payment_status(&self, id: OrderId, status: PaymentStatus) {
        if let Some(mut order) = self.orders.get_mut(&id.0) {
            order.payment_status = status;
            order.updated_at = Utc::now();
        }
    }
}

#[async_trait]
impl OrderRepository for MockOrderRepository {
    async fn create(&self, _order: NewOrder) -> DbResult<Order> {
        unreachable!("payment tests seed orders directly")
    }

    async fn find_by_id(&self, id: OrderId) -> DbResult<Option<Order>> {
        Ok(self.orders.get(&id.0).map(|r| r.value().clone()))
    }

    async fn list_by_user(&self, user_id: UserId, limit: i64) -> DbResult<Vec<Order>> {
        let mut orders: Vec<Order> = self
            .orders
            .iter()
            .filter(|r| r.value().user_id == user_id)
            .map(|r| r.value().clone())
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders.truncate(limit as usize);
        Ok(orders)
    }

    async fn transition_status(
        &self,
        id: OrderId,
        expected: &[OrderStatus],
        to: OrderStatus,
    ) -> DbResult<bool> {
        let Some(mut order) = self.orders.get_mut(&id.0) else {
            return Ok(false);
        };
        if !expected.contains(&order.status) {
            return Ok(false);
        }
        order.status = to;
        Ok(true)
    }

    async fn complete(
        &self,
        id: OrderId,
        expected: &[OrderStatus],
        actual_delivery_date: DateTime<Utc>,
        attachments: &[Attachment],
    ) -> DbResult<bool> {
        let Some(mut order) = self.orders.get_mut(&id.0) else {
            return Ok(false);
        };
        if !expected.contains(&order.status) {
            return Ok(false);
        }
        order.status = OrderStatus::Completed;
        order.actual_delivery_date = Some(actual_delivery_date);
        order.completion_deliveries.extend_from_slice(attachments);
        Ok(true)
    }

    async fn append_attachment(
        &self,
        id: OrderId,
        log: AttachmentLog,
        attachment: &Attachment,
    ) -> DbResult<()> {
        let mut order = self.orders.get_mut(&id.0).ok_or(DbError::NotFound)?;
        match log {
            AttachmentLog::Delivery => order.deliveries.push(attachment.clone()),
            AttachmentLog::Completion => order.completion_deliveries.push(attachment.clone()),
            AttachmentLog::CustomerUpload => order.customer_uploads.push(attachment.clone()),
        }
        Ok(())
    }

    async fn replace_delivery(&self, id: OrderId, attachment: &Attachment) -> DbResult<()> {
        let mut order = self.orders.get_mut(&id.0).ok_or(DbError::NotFound)?;
        order.deliveries.retain(|a| a.kind != attachment.kind);
        order.deliveries.push(attachment.clone());
        Ok(())
    }

    async fn set_invoice_ref(&self, id: OrderId, invoice_ref: &str) -> DbResult<()> {
        let mut order = self.orders.get_mut(&id.0).ok_or(DbError::NotFound)?;
        order.invoice_ref = Some(invoice_ref.to_string());
        Ok(())
    }
}

/// In-memory payment repository for testing
///
/// Settlement mutates the payment, the account and the order under one
/// mutex so concurrent settlements observe all-or-nothing, mirroring the
/// Postgres transaction.
#[derive(Clone)]
pub struct MockPaymentRepository {
    payments: Arc<DashMap<Uuid, Payment>>,
    by_session: Arc<DashMap<String, Uuid>>,
    users: MockUserRepository,
    orders: MockOrderRepository,
    settle_lock: Arc<Mutex<()>>,
}

impl MockPaymentRepository {
    pub fn new(users: MockUserRepository, orders: MockOrderRepository) -> Self {
        Self {
            payments: Arc::new(DashMap::new()),
            by_session: Arc::new(DashMap::new()),
            users,
            orders,
            settle_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Flip a pending payment to completed; true when this call won
    fn flip_completed(&self, id: PaymentId, paid_cents: i64, processor_ref: &str) -> bool {
        let Some(mut payment) = self.payments.get_mut(&id.0) else {
            return false;
        };
        if payment.status != PaymentState::Pending {
            return false;
        }
        payment.status = PaymentState::Completed;
        payment.paid_cents = Some(paid_cents);
        payment.discount_cents = payment.amount_cents - paid_cents;
        payment.processor_invoice_id = Some(processor_ref.to_string());
        payment.completed_at = Some(Utc::now());
        true
    }
}

#[async_trait]
impl PaymentRepository for MockPaymentRepository {
    async fn create(&self, payment: NewPayment) -> DbResult<Payment> {
        let row = Payment {
            id: payment.id,
            user_id: payment.user_id,
            order_id: payment.order_id,
            kind: payment.kind,
            status: PaymentState::Pending,
            amount_cents: payment.amount_cents,
            paid_cents: None,
            discount_cents: 0,
            processor_session_id: payment.processor_session_id.clone(),
            processor_invoice_id: None,
            metadata: payment.metadata,
            failure_reason: None,
            created_at: Utc::now(),
            completed_at: None,
        };
        if let Some(session) = payment.processor_session_id {
            self.by_session.insert(session, row.id.0);
        }
        self.payments.insert(row.id.0, row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, id: PaymentId) -> DbResult<Option<Payment>> {
        Ok(self.payments.get(&id.0).map(|r| r.value().clone()))
    }

    async fn find_by_session_id(&self, session_id: &str) -> DbResult<Option<Payment>> {
        Ok(self
            .by_session
            .get(session_id)
            .and_then(|id| self.payments.get(id.value()).map(|r| r.value().clone())))
    }

    async fn list_by_user(&self, user_id: UserId, limit: i64) -> DbResult<Vec<Payment>> {
        let mut payments: Vec<Payment> = self
            .payments
            .iter()
            .filter(|r| r.value().user_id == user_id)
            .map(|r| r.value().clone())
            .collect();
        payments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        payments.truncate(limit as usize);
        Ok(payments)
    }

    async fn settle_top_up(
        &self,
        id: PaymentId,
        user_id: UserId,
        paid_cents: i64,
        processor_ref: &str,
    ) -> DbResult<bool> {
        let _guard = self.settle_lock.lock().unwrap();
        if !self.flip_completed(id, paid_cents, processor_ref) {
            return Ok(false);
        }
        self.users.credit_balance(user_id, paid_cents);
        Ok(true)
    }

    async fn settle_order_payment(
        &self,
        id: PaymentId,
        order_id: OrderId,
        user_id: UserId,
        paid_cents: i64,
        processor_ref: &str,
    ) -> DbResult<bool> {
        let _guard = self.settle_lock.lock().unwrap();
        if !self.flip_completed(id, paid_cents, processor_ref) {
            return Ok(false);
        }
        self.orders.set_payment_status(order_id, PaymentStatus::Paid);
        self.users.add_spend(user_id, paid_cents);
        Ok(true)
    }

    async fn mark_failed(&self, id: PaymentId, reason: &str) -> DbResult<bool> {
        let _guard = self.settle_lock.lock().unwrap();
        let Some(mut payment) = self.payments.get_mut(&id.0) else {
            return Ok(false);
        };
        if payment.status != PaymentState::Pending {
            return Ok(false);
        }
        payment.status = PaymentState::Failed;
        payment.failure_reason = Some(reason.to_string());
        payment.completed_at = Some(Utc::now());
        Ok(true)
    }
}

/// Fake processor returning deterministic checkout sessions
#[derive(Default)]
pub struct MockProcessor {
    counter: AtomicI64,
}

impl MockProcessor {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentProcessor for MockProcessor {
    async fn create_checkout_session(
        &self,
        request: CheckoutRequest<'_>,
    ) -> Result<CheckoutSession, PaymentError> {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let session_id = format!("cs_test_{n}_{}", request.reference);
        Ok(CheckoutSession {
            url: format!("https://checkout.example.com/{session_id}"),
            session_id,
        })
    }
}
