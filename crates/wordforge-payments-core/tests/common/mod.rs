//! Shared test fixtures

pub mod mock_repos;

use std::sync::Arc;

use chrono::{Duration, Utc};
use wordforge_payments_core::{PaymentService, PaymentsConfig};
use wordforge_types::{Order, OrderId, OrderItem, OrderStatus, PaymentStatus, UserId};

use mock_repos::{MockOrderRepository, MockPaymentRepository, MockProcessor, MockUserRepository};

/// Service wired to in-memory repositories and a fake processor
pub struct TestContext {
    #[allow(dead_code)]
    pub payments: Arc<MockPaymentRepository>,
    pub orders: Arc<MockOrderRepository>,
    pub users: Arc<MockUserRepository>,
    pub service:
        Arc<PaymentService<MockPaymentRepository, MockOrderRepository, MockUserRepository>>,
}

impl TestContext {
    pub fn new() -> Self {
        let users = Arc::new(MockUserRepository::new());
        let orders = Arc::new(MockOrderRepository::new());
        let payments = Arc::new(MockPaymentRepository::new(
            users.as_ref().clone(),
            orders.as_ref().clone(),
        ));
        let config = PaymentsConfig::new("sk_test_123", "whsec_test_123");
        let service = Arc::new(PaymentService::new(
            config,
            Arc::clone(&payments),
            Arc::clone(&orders),
            Arc::clone(&users),
            Arc::new(MockProcessor::new()),
        ));
        Self {
            payments,
            orders,
            users,
            service,
        }
    }

    /// Clone a service handle for a spawned task
    pub fn service_clone(
        &self,
    ) -> Arc<PaymentService<MockPaymentRepository, MockOrderRepository, MockUserRepository>> {
        Arc::clone(&self.service)
    }

    /// Seed a customer account and return its ID
    pub fn seed_account(&self) -> UserId {
        let account = MockUserRepository::create_test_account("customer");
        let id = account.id;
        self.users.insert_account(account);
        id
    }

    /// Seed a pending order owned by `user_id`
    pub fn seed_order(&self, user_id: UserId, total_price_cents: i64) -> OrderId {
        let now = Utc::now();
        let order = Order {
            id: OrderId::new(),
            order_number: self.orders.next_seed_number(),
            user_id,
            items: vec![OrderItem {
                item_number: self.orders.next_seed_number(),
                topic: "Blog post".to_string(),
                length_words: 600,
                content_type: "article".to_string(),
                language: "en".to_string(),
                unit_price_cents: total_price_cents,
                guidelines: None,
            }],
            total_price_cents,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            declared_delivery_date: now + Duration::days(3),
            actual_delivery_date: None,
            deliveries: Vec::new(),
            completion_deliveries: Vec::new(),
            customer_uploads: Vec::new(),
            invoice_ref: None,
            created_at: now,
            updated_at: now,
        };
        let id = order.id;
        self.orders.insert_order(order);
        id
    }
}
