//! Shared test fixtures

pub mod mock_repos;

use std::sync::Arc;

use wordforge_orders_core::{OrderService, OrdersConfig};
use wordforge_types::UserId;

use mock_repos::{MockOrderRepository, MockSequenceRepository, MockUserRepository};

/// Service wired to in-memory repositories
pub struct TestContext {
    pub orders: Arc<MockOrderRepository>,
    #[allow(dead_code)]
    pub sequences: Arc<MockSequenceRepository>,
    pub users: Arc<MockUserRepository>,
    pub service:
        Arc<OrderService<MockOrderRepository, MockSequenceRepository, MockUserRepository>>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(OrdersConfig::default())
    }

    pub fn with_config(config: OrdersConfig) -> Self {
        let orders = Arc::new(MockOrderRepository::new());
        let sequences = Arc::new(MockSequenceRepository::new());
        let users = Arc::new(MockUserRepository::new());
        let service = Arc::new(OrderService::new(
            config,
            Arc::clone(&orders),
            Arc::clone(&sequences),
            Arc::clone(&users),
        ));
        Self {
            orders,
            sequences,
            users,
            service,
        }
    }

    /// Clone a service handle for a spawned task
    pub fn service_clone(
        &self,
    ) -> Arc<OrderService<MockOrderRepository, MockSequenceRepository, MockUserRepository>> {
        Arc::clone(&self.service)
    }

    /// Seed a customer account and return its ID
    pub fn seed_account(&self) -> UserId {
        let account = MockUserRepository::create_test_account("customer");
        let id = account.id;
        self.users.insert_account(account);
        id
    }
}
