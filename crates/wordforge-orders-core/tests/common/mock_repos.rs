//! Mock repositories for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::{DashMap, DashSet};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

use wordforge_db::{
    CreateAccount, DbError, DbResult, NewOrder, OrderRepository, SequenceRepository,
    UserRepository,
};
use wordforge_types::{
    Account, Attachment, AttachmentLog, BillingProfile, NotificationPrefs, Order, OrderId,
    OrderItem, OrderStatus, PaymentStatus, UserId,
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
            account.updated_at = Utc::now();
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
            account.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn set_verified(&self, id: UserId, verified: bool) -> DbResult<()> {
        if let Some(mut account) = self.accounts.get_mut(&id.0) {
            account.verified = verified;
            account.updated_at = Utc::now();
        }
        Ok(())
    }
}

/// In-memory number sequences for testing
#[derive(Default)]
pub struct MockSequenceRepository {
    order_counter: AtomicI64,
    item_counter: AtomicI64,
}

impl MockSequenceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SequenceRepository for MockSequenceRepository {
    async fn next_order_number(&self) -> DbResult<i64> {
        Ok(self.order_counter.fetch_add(1, Ordering::SeqCst) + 1)
    }

    async fn reserve_item_numbers(&self, count: i64) -> DbResult<i64> {
        Ok(self.item_counter.fetch_add(count, Ordering::SeqCst) + 1)
    }
}

/// In-memory order repository for testing
///
/// Tracks used order and item numbers the way the unique indexes would,
/// so collision handling can be exercised.
#[derive(Default, Clone)]
pub struct MockOrderRepository {
    orders: Arc<DashMap<Uuid, Order>>,
    order_numbers: Arc<DashSet<i64>>,
    item_numbers: Arc<DashSet<i64>>,
}

impl MockOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend a number is already taken, as if another writer committed it
    pub fn occupy_order_number(&self, number: i64) {
        self.order_numbers.insert(number);
    }
}

#[async_trait]
impl OrderRepository for MockOrderRepository {
    async fn create(&self, order: NewOrder) -> DbResult<Order> {
        if !self.order_numbers.insert(order.order_number) {
            return Err(DbError::Conflict);
        }
        for item in &order.items {
            if !self.item_numbers.insert(item.item_number) {
                return Err(DbError::Conflict);
            }
        }

        let now = Utc::now();
        let row = Order {
            id: order.id,
            order_number: order.order_number,
            user_id: order.user_id,
            items: order
                .items
                .into_iter()
                .map(|i| OrderItem {
                    item_number: i.item_number,
                    topic: i.topic,
                    length_words: i.length_words,
                    content_type: i.content_type,
                    language: i.language,
                    unit_price_cents: i.unit_price_cents,
                    guidelines: i.guidelines,
                })
                .collect(),
            total_price_cents: order.total_price_cents,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            declared_delivery_date: order.declared_delivery_date,
            actual_delivery_date: None,
            deliveries: Vec::new(),
            completion_deliveries: Vec::new(),
            customer_uploads: Vec::new(),
            invoice_ref: None,
            created_at: now,
            updated_at: now,
        };
        self.orders.insert(row.id.0, row.clone());
        Ok(row)
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
        order.updated_at = Utc::now();
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
        order.updated_at = Utc::now();
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
        order.updated_at = Utc::now();
        Ok(())
    }

    async fn replace_delivery(&self, id: OrderId, attachment: &Attachment) -> DbResult<()> {
        let mut order = self.orders.get_mut(&id.0).ok_or(DbError::NotFound)?;
        order.deliveries.retain(|a| a.kind != attachment.kind);
        order.deliveries.push(attachment.clone());
        order.updated_at = Utc::now();
        Ok(())
    }

    async fn set_invoice_ref(&self, id: OrderId, invoice_ref: &str) -> DbResult<()> {
        let mut order = self.orders.get_mut(&id.0).ok_or(DbError::NotFound)?;
        order.invoice_ref = Some(invoice_ref.to_string());
        order.updated_at = Utc::now();
        Ok(())
    }
}
