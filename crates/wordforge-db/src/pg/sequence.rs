//! PostgreSQL number sequence implementation
//!
//! Named counters live in the `sequences` table and are advanced with a
//! single atomic read-increment-write; the unique indexes on order and
//! item numbers are the backstop against any racing allocation.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::DbResult;
use crate::repo::SequenceRepository;

const ORDER_NUMBER_SEQ: &str = "order_number";
const ITEM_NUMBER_SEQ: &str = "item_number";

/// PostgreSQL number sequences
#[derive(Clone)]
pub struct PgSequenceRepository {
    pool: PgPool,
}

impl PgSequenceRepository {
    /// Create a new sequence repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn advance(&self, name: &str, by: i64) -> DbResult<i64> {
        let value: i64 = sqlx::query_scalar(
            "UPDATE sequences SET value = value + $1 WHERE name = $2 RETURNING value",
        )
        .bind(by)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(value)
    }
}

#[async_trait]
impl SequenceRepository for PgSequenceRepository {
    async fn next_order_number(&self) -> DbResult<i64> {
        self.advance(ORDER_NUMBER_SEQ, 1).await
    }

    async fn reserve_item_numbers(&self, count: i64) -> DbResult<i64> {
        let top = self.advance(ITEM_NUMBER_SEQ, count).await?;
        Ok(top - count + 1)
    }
}
