//! Database row models
//!
//! These types map directly to database rows using SQLx's FromRow derive.
//! Conversions into `wordforge-types` domain types live here so the
//! repository implementations stay query-only.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use wordforge_types::{
    Account, Attachment, BillingProfile, NotificationPrefs, Order, OrderItem, Payment,
};

use crate::error::DbError;

/// Account row from the database
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub verified: bool,
    pub balance_cents: i64,
    pub total_spent_cents: i64,
    pub company_name: Option<String>,
    pub tax_id: Option<String>,
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub building_no: Option<String>,
    pub notify_order_updates: bool,
    pub notify_payment_receipts: bool,
    pub notify_marketing: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for Account {
    type Error = DbError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = row
            .role
            .parse()
            .map_err(|_| DbError::Decode(format!("role: {}", row.role)))?;

        Ok(Account {
            id: row.id.into(),
            email: row.email,
            password_hash: row.password_hash,
            role,
            verified: row.verified,
            balance_cents: row.balance_cents,
            total_spent_cents: row.total_spent_cents,
            billing: BillingProfile {
                company_name: row.company_name,
                tax_id: row.tax_id,
                address: row.address,
                postal_code: row.postal_code,
                city: row.city,
                building_no: row.building_no,
            },
            notifications: NotificationPrefs {
                order_updates: row.notify_order_updates,
                payment_receipts: row.notify_payment_receipts,
                marketing: row.notify_marketing,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Order row from the database (items and attachments live in child tables)
#[derive(Debug, Clone, FromRow)]
pub struct OrderRow {
    pub id: Uuid,
    pub order_number: i64,
    pub user_id: Uuid,
    pub total_price_cents: i64,
    pub status: String,
    pub payment_status: String,
    pub declared_delivery_date: DateTime<Utc>,
    pub actual_delivery_date: Option<DateTime<Utc>>,
    pub invoice_ref: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderRow {
    /// Assemble the domain order from this row and its children
    pub fn into_order(
        self,
        items: Vec<OrderItemRow>,
        attachments: Vec<AttachmentRow>,
    ) -> Result<Order, DbError> {
        let status = self
            .status
            .parse()
            .map_err(|_| DbError::Decode(format!("order status: {}", self.status)))?;
        let payment_status = self
            .payment_status
            .parse()
            .map_err(|_| DbError::Decode(format!("payment status: {}", self.payment_status)))?;

        let mut deliveries = Vec::new();
        let mut completion_deliveries = Vec::new();
        let mut customer_uploads = Vec::new();
        for row in attachments {
            let log = row
                .log
                .parse::<wordforge_types::AttachmentLog>()
                .map_err(|_| DbError::Decode(format!("attachment log: {}", row.log)))?;
            let attachment = Attachment::try_from(row)?;
            match log {
                wordforge_types::AttachmentLog::Delivery => deliveries.push(attachment),
                wordforge_types::AttachmentLog::Completion => {
                    completion_deliveries.push(attachment)
                }
                wordforge_types::AttachmentLog::CustomerUpload => {
                    customer_uploads.push(attachment)
                }
            }
        }

        Ok(Order {
            id: self.id.into(),
            order_number: self.order_number,
            user_id: self.user_id.into(),
            items: items.into_iter().map(OrderItem::from).collect(),
            total_price_cents: self.total_price_cents,
            status,
            payment_status,
            declared_delivery_date: self.declared_delivery_date,
            actual_delivery_date: self.actual_delivery_date,
            deliveries,
            completion_deliveries,
            customer_uploads,
            invoice_ref: self.invoice_ref,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Order item row from the database
#[derive(Debug, Clone, FromRow)]
pub struct OrderItemRow {
    pub order_id: Uuid,
    pub item_number: i64,
    pub topic: String,
    pub length_words: i32,
    pub content_type: String,
    pub language: String,
    pub unit_price_cents: i64,
    pub guidelines: Option<String>,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        OrderItem {
            item_number: row.item_number,
            topic: row.topic,
            length_words: row.length_words,
            content_type: row.content_type,
            language: row.language,
            unit_price_cents: row.unit_price_cents,
            guidelines: row.guidelines,
        }
    }
}

/// Attachment row from the database
#[derive(Debug, Clone, FromRow)]
pub struct AttachmentRow {
    pub order_id: Uuid,
    pub log: String,
    pub filename: String,
    pub url: String,
    pub kind: String,
    pub uploaded_at: DateTime<Utc>,
}

impl TryFrom<AttachmentRow> for Attachment {
    type Error = DbError;

    fn try_from(row: AttachmentRow) -> Result<Self, Self::Error> {
        let kind = row
            .kind
            .parse()
            .map_err(|_| DbError::Decode(format!("file kind: {}", row.kind)))?;

        Ok(Attachment {
            filename: row.filename,
            url: row.url,
            kind,
            uploaded_at: row.uploaded_at,
        })
    }
}

/// Payment row from the database
#[derive(Debug, Clone, FromRow)]
pub struct PaymentRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub order_id: Option<Uuid>,
    pub kind: String,
    pub status: String,
    pub amount_cents: i64,
    pub paid_cents: Option<i64>,
    pub discount_cents: i64,
    pub processor_session_id: Option<String>,
    pub processor_invoice_id: Option<String>,
    pub metadata: serde_json::Value,
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = DbError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        let kind = row
            .kind
            .parse()
            .map_err(|_| DbError::Decode(format!("payment kind: {}", row.kind)))?;
        let status = row
            .status
            .parse()
            .map_err(|_| DbError::Decode(format!("payment state: {}", row.status)))?;

        Ok(Payment {
            id: row.id.into(),
            user_id: row.user_id.into(),
            order_id: row.order_id.map(Into::into),
            kind,
            status,
            amount_cents: row.amount_cents,
            paid_cents: row.paid_cents,
            discount_cents: row.discount_cents,
            processor_session_id: row.processor_session_id,
            processor_invoice_id: row.processor_invoice_id,
            metadata: row.metadata,
            failure_reason: row.failure_reason,
            created_at: row.created_at,
            completed_at: row.completed_at,
        })
    }
}
