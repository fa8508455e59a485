//! Application state for the Marketplace API service.

use std::sync::Arc;

use wordforge_accounts_core::AccountService;
use wordforge_db::pg::{
    PgOrderRepository, PgPaymentRepository, PgSequenceRepository, PgUserRepository,
};
use wordforge_db::{DbPool, Repositories};
use wordforge_orders_core::OrderService;
use wordforge_payments_core::{PaymentService, StripeProcessor};

use crate::config::Config;

/// Order service over the Postgres repositories
pub type Orders = OrderService<PgOrderRepository, PgSequenceRepository, PgUserRepository>;
/// Payment service over the Postgres repositories
pub type Payments = PaymentService<PgPaymentRepository, PgOrderRepository, PgUserRepository>;
/// Account service over the Postgres repositories
pub type Accounts = AccountService<PgUserRepository>;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Order lifecycle service
    pub orders: Arc<Orders>,
    /// Payment and settlement service
    pub payments: Arc<Payments>,
    /// Account service
    pub accounts: Arc<Accounts>,
    /// Database pool (readiness probe)
    pub pool: DbPool,
    /// Configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Wire services to the Postgres repositories
    pub fn new(pool: DbPool, config: Config) -> Self {
        let repos = Repositories::new(pool.clone());

        let users = Arc::new(repos.users);
        let order_repo = Arc::new(repos.orders);
        let payment_repo = Arc::new(repos.payments);
        let sequences = Arc::new(repos.sequences);

        let orders = Arc::new(OrderService::new(
            config.orders.clone(),
            Arc::clone(&order_repo),
            sequences,
            Arc::clone(&users),
        ));
        let payments = Arc::new(PaymentService::new(
            config.payments.clone(),
            payment_repo,
            order_repo,
            Arc::clone(&users),
            Arc::new(StripeProcessor::new(config.payments.clone())),
        ));
        let accounts = Arc::new(AccountService::new(users));

        Self {
            orders,
            payments,
            accounts,
            pool,
            config: Arc::new(config),
        }
    }

    /// Get request timeout from config
    pub fn request_timeout(&self) -> std::time::Duration {
        self.config.request_timeout
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
