//! PostgreSQL payment repository implementation
//!
//! Settlement is the dual-write in this system: the payment flip and its
//! balance/order side effect run in one transaction, guarded by a
//! `status = 'pending'` predicate so concurrent settlements cannot apply
//! twice.

use async_trait::async_trait;
use sqlx::PgPool;

use wordforge_types::{OrderId, Payment, PaymentId, UserId};

use crate::error::DbResult;
use crate::models::PaymentRow;
use crate::repo::{NewPayment, PaymentRepository};

const PAYMENT_COLUMNS: &str = r#"
    id, user_id, order_id, kind, status, amount_cents, paid_cents, discount_cents,
    processor_session_id, processor_invoice_id, metadata, failure_reason,
    created_at, completed_at
"#;

/// PostgreSQL payment repository
#[derive(Clone)]
pub struct PgPaymentRepository {
    pool: PgPool,
}

impl PgPaymentRepository {
    /// Create a new payment repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentRepository for PgPaymentRepository {
    async fn create(&self, payment: NewPayment) -> DbResult<Payment> {
        let row = sqlx::query_as::<_, PaymentRow>(&format!(
            r#"
            INSERT INTO payments (id, user_id, order_id, kind, amount_cents,
                                  processor_session_id, metadata)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {PAYMENT_COLUMNS}
            "#
        ))
        .bind(payment.id.0)
        .bind(payment.user_id.0)
        .bind(payment.order_id.map(|o| o.0))
        .bind(payment.kind.to_string())
        .bind(payment.amount_cents)
        .bind(&payment.processor_session_id)
        .bind(&payment.metadata)
        .fetch_one(&self.pool)
        .await?;

        Payment::try_from(row)
    }

    async fn find_by_id(&self, id: PaymentId) -> DbResult<Option<Payment>> {
        let row = sqlx::query_as::<_, PaymentRow>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE id = $1"
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Payment::try_from).transpose()
    }

    async fn find_by_session_id(&self, session_id: &str) -> DbResult<Option<Payment>> {
        let row = sqlx::query_as::<_, PaymentRow>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE processor_session_id = $1"
        ))
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Payment::try_from).transpose()
    }

    async fn list_by_user(&self, user_id: UserId, limit: i64) -> DbResult<Vec<Payment>> {
        let rows = sqlx::query_as::<_, PaymentRow>(&format!(
            r#"
            SELECT {PAYMENT_COLUMNS} FROM payments
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#
        ))
        .bind(user_id.0)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Payment::try_from).collect()
    }

    async fn settle_top_up(
        &self,
        id: PaymentId,
        user_id: UserId,
        paid_cents: i64,
        processor_ref: &str,
    ) -> DbResult<bool> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE payments
            SET status = 'completed', paid_cents = $2,
                discount_cents = amount_cents - $2,
                processor_invoice_id = $3, completed_at = now()
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(id.0)
        .bind(paid_cents)
        .bind(processor_ref)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query(
            r#"
            UPDATE users
            SET balance_cents = balance_cents + $2, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(user_id.0)
        .bind(paid_cents)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
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
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE payments
            SET status = 'completed', paid_cents = $2,
                discount_cents = amount_cents - $2,
                processor_invoice_id = $3, completed_at = now()
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(id.0)
        .bind(paid_cents)
        .bind(processor_ref)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query(
            "UPDATE orders SET payment_status = 'paid', updated_at = now() WHERE id = $1",
        )
        .bind(order_id.0)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE users
            SET total_spent_cents = total_spent_cents + $2, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(user_id.0)
        .bind(paid_cents)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn mark_failed(&self, id: PaymentId, reason: &str) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE payments
            SET status = 'failed', failure_reason = $2, completed_at = now()
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(id.0)
        .bind(reason)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
