//! PostgreSQL repository implementations

mod order;
mod payment;
mod sequence;
mod user;

pub use order::PgOrderRepository;
pub use payment::PgPaymentRepository;
pub use sequence::PgSequenceRepository;
pub use user::PgUserRepository;

use crate::DbPool;

/// All repositories bundled together
#[derive(Clone)]
pub struct Repositories {
    pub users: PgUserRepository,
    pub orders: PgOrderRepository,
    pub payments: PgPaymentRepository,
    pub sequences: PgSequenceRepository,
}

impl Repositories {
    /// Create all repositories from a database pool
    pub fn new(pool: DbPool) -> Self {
        Self {
            users: PgUserRepository::new(pool.clone()),
            orders: PgOrderRepository::new(pool.clone()),
            payments: PgPaymentRepository::new(pool.clone()),
            sequences: PgSequenceRepository::new(pool),
        }
    }
}
