//! PostgreSQL order repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use wordforge_types::{Attachment, AttachmentLog, Order, OrderId, OrderStatus, UserId};

use crate::error::DbResult;
use crate::models::{AttachmentRow, OrderItemRow, OrderRow};
use crate::repo::{NewOrder, OrderRepository};

const ORDER_COLUMNS: &str = r#"
    id, order_number, user_id, total_price_cents, status, payment_status,
    declared_delivery_date, actual_delivery_date, invoice_ref,
    created_at, updated_at
"#;

const ITEM_COLUMNS: &str = r#"
    order_id, item_number, topic, length_words, content_type, language,
    unit_price_cents, guidelines
"#;

const ATTACHMENT_COLUMNS: &str = "order_id, log, filename, url, kind, uploaded_at";

/// PostgreSQL order repository
#[derive(Clone)]
pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    /// Create a new order repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_children(
        &self,
        order_id: Uuid,
    ) -> DbResult<(Vec<OrderItemRow>, Vec<AttachmentRow>)> {
        let items = sqlx::query_as::<_, OrderItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = $1 ORDER BY item_number"
        ))
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        let attachments = sqlx::query_as::<_, AttachmentRow>(&format!(
            "SELECT {ATTACHMENT_COLUMNS} FROM attachments WHERE order_id = $1 ORDER BY uploaded_at"
        ))
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok((items, attachments))
    }
}

async fn insert_attachment(
    tx: &mut Transaction<'_, Postgres>,
    order_id: Uuid,
    log: AttachmentLog,
    attachment: &Attachment,
) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO attachments (order_id, log, filename, url, kind, uploaded_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(order_id)
    .bind(log.to_string())
    .bind(&attachment.filename)
    .bind(&attachment.url)
    .bind(attachment.kind.to_string())
    .bind(attachment.uploaded_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

fn status_strings(expected: &[OrderStatus]) -> Vec<String> {
    expected.iter().map(ToString::to_string).collect()
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn create(&self, order: NewOrder) -> DbResult<Order> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r#"
            INSERT INTO orders (id, order_number, user_id, total_price_cents,
                                declared_delivery_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(order.id.0)
        .bind(order.order_number)
        .bind(order.user_id.0)
        .bind(order.total_price_cents)
        .bind(order.declared_delivery_date)
        .fetch_one(&mut *tx)
        .await?;

        let mut item_rows = Vec::with_capacity(order.items.len());
        for item in &order.items {
            let item_row = sqlx::query_as::<_, OrderItemRow>(&format!(
                r#"
                INSERT INTO order_items (order_id, item_number, topic, length_words,
                                         content_type, language, unit_price_cents, guidelines)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING {ITEM_COLUMNS}
                "#
            ))
            .bind(order.id.0)
            .bind(item.item_number)
            .bind(&item.topic)
            .bind(item.length_words)
            .bind(&item.content_type)
            .bind(&item.language)
            .bind(item.unit_price_cents)
            .bind(&item.guidelines)
            .fetch_one(&mut *tx)
            .await?;
            item_rows.push(item_row);
        }

        tx.commit().await?;

        row.into_order(item_rows, Vec::new())
    }

    async fn find_by_id(&self, id: OrderId) -> DbResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let (items, attachments) = self.load_children(row.id).await?;
        row.into_order(items, attachments).map(Some)
    }

    async fn list_by_user(&self, user_id: UserId, limit: i64) -> DbResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            r#"
            SELECT {ORDER_COLUMNS} FROM orders
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#
        ))
        .bind(user_id.0)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let (items, attachments) = self.load_children(row.id).await?;
            orders.push(row.into_order(items, attachments)?);
        }

        Ok(orders)
    }

    async fn transition_status(
        &self,
        id: OrderId,
        expected: &[OrderStatus],
        to: OrderStatus,
    ) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE orders SET status = $2, updated_at = now()
            WHERE id = $1 AND status = ANY($3)
            "#,
        )
        .bind(id.0)
        .bind(to.to_string())
        .bind(status_strings(expected))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn complete(
        &self,
        id: OrderId,
        expected: &[OrderStatus],
        actual_delivery_date: DateTime<Utc>,
        attachments: &[Attachment],
    ) -> DbResult<bool> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE orders
            SET status = 'completed', actual_delivery_date = $2, updated_at = now()
            WHERE id = $1 AND status = ANY($3)
            "#,
        )
        .bind(id.0)
        .bind(actual_delivery_date)
        .bind(status_strings(expected))
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        for attachment in attachments {
            insert_attachment(&mut tx, id.0, AttachmentLog::Completion, attachment).await?;
        }

        tx.commit().await?;
        Ok(true)
    }

    async fn append_attachment(
        &self,
        id: OrderId,
        log: AttachmentLog,
        attachment: &Attachment,
    ) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;
        insert_attachment(&mut tx, id.0, log, attachment).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn replace_delivery(&self, id: OrderId, attachment: &Attachment) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "DELETE FROM attachments WHERE order_id = $1 AND log = 'delivery' AND kind = $2",
        )
        .bind(id.0)
        .bind(attachment.kind.to_string())
        .execute(&mut *tx)
        .await?;

        insert_attachment(&mut tx, id.0, AttachmentLog::Delivery, attachment).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn set_invoice_ref(&self, id: OrderId, invoice_ref: &str) -> DbResult<()> {
        sqlx::query("UPDATE orders SET invoice_ref = $2, updated_at = now() WHERE id = $1")
            .bind(id.0)
            .bind(invoice_ref)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
