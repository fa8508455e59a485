//! Order service - creation, status machine and attachment bookkeeping

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};

use wordforge_db::{
    DbError, NewOrder, NewOrderItem, OrderRepository, SequenceRepository, UserRepository,
};
use wordforge_types::{Attachment, AttachmentLog, FileKind, Order, OrderId, OrderStatus, UserId};

use crate::{config::OrdersConfig, error::OrderError};

/// One requested line item, before numbers are assigned
#[derive(Debug, Clone)]
pub struct OrderItemSpec {
    /// Subject of the piece
    pub topic: String,
    /// Requested length in words
    pub length_words: i32,
    /// Content type, e.g. "article"
    pub content_type: String,
    /// Target language code
    pub language: String,
    /// Price in minor currency units
    pub unit_price_cents: i64,
    /// Optional writer guidelines
    pub guidelines: Option<String>,
}

/// A file reference about to be attached to an order
#[derive(Debug, Clone)]
pub struct NewAttachment {
    /// Original filename
    pub filename: String,
    /// Storage URL
    pub url: String,
}

impl NewAttachment {
    fn into_attachment(self, now: DateTime<Utc>) -> Attachment {
        let kind = FileKind::from_filename(&self.filename);
        Attachment {
            filename: self.filename,
            url: self.url,
            kind,
            uploaded_at: now,
        }
    }
}

/// Sum of item prices in minor currency units
pub fn order_total_cents(items: &[OrderItemSpec]) -> i64 {
    items.iter().map(|i| i.unit_price_cents).sum()
}

/// Validate order input and return the computed total
///
/// Rejects empty item lists, negative prices and delivery dates in the
/// past, the same checks the store cannot express.
pub fn validate_order_input(
    items: &[OrderItemSpec],
    declared_delivery_date: DateTime<Utc>,
    now: DateTime<Utc>,
    max_items: usize,
) -> Result<i64, OrderError> {
    if items.is_empty() {
        return Err(OrderError::Validation(
            "order must contain at least one item".to_string(),
        ));
    }
    if items.len() > max_items {
        return Err(OrderError::Validation(format!(
            "order exceeds the item cap of {max_items}"
        )));
    }
    if let Some(item) = items.iter().find(|i| i.unit_price_cents < 0) {
        return Err(OrderError::Validation(format!(
            "item price must not be negative: {}",
            item.unit_price_cents
        )));
    }
    if items.iter().any(|i| i.topic.trim().is_empty()) {
        return Err(OrderError::Validation("item topic must not be empty".to_string()));
    }
    if declared_delivery_date < now {
        return Err(OrderError::Validation(
            "declared delivery date precedes the current time".to_string(),
        ));
    }

    Ok(order_total_cents(items))
}

/// Order service
///
/// Owns the order lifecycle:
/// - creation with globally unique, never-reused order and item numbers
/// - the status machine (pending → in_progress → completed / cancelled)
/// - delivery, completion and customer-upload attachment logs
///
/// Every transition is a compare-and-set against the store, so racing
/// staff/customer actions cannot lose updates.
pub struct OrderService<O: OrderRepository, S: SequenceRepository, U: UserRepository> {
    config: OrdersConfig,
    orders: Arc<O>,
    sequences: Arc<S>,
    users: Arc<U>,
}

impl<O: OrderRepository, S: SequenceRepository, U: UserRepository> OrderService<O, S, U> {
    /// Create a new order service
    pub fn new(config: OrdersConfig, orders: Arc<O>, sequences: Arc<S>, users: Arc<U>) -> Self {
        Self {
            config,
            orders,
            sequences,
            users,
        }
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Create an order from at least one item spec
    ///
    /// Assigns a fresh order number and one item number per item from the
    /// shared sequences; a unique-index collision (another writer got the
    /// same numbers first) is retried with fresh numbers up to the
    /// configured budget.
    #[instrument(skip(self, items), fields(user_id = %user_id, item_count = items.len()))]
    pub async fn create_order(
        &self,
        user_id: UserId,
        items: Vec<OrderItemSpec>,
        declared_delivery_date: DateTime<Utc>,
    ) -> Result<Order, OrderError> {
        let total_price_cents = validate_order_input(
            &items,
            declared_delivery_date,
            Utc::now(),
            self.config.max_items_per_order,
        )?;

        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(OrderError::AccountNotFound);
        }

        for attempt in 0..self.config.create_retry_attempts {
            let order_number = self.sequences.next_order_number().await?;
            let first_item_number = self
                .sequences
                .reserve_item_numbers(items.len() as i64)
                .await?;

            let new_order = NewOrder {
                id: OrderId::new(),
                order_number,
                user_id,
                items: items
                    .iter()
                    .enumerate()
                    .map(|(offset, item)| NewOrderItem {
                        item_number: first_item_number + offset as i64,
                        topic: item.topic.clone(),
                        length_words: item.length_words,
                        content_type: item.content_type.clone(),
                        language: item.language.clone(),
                        unit_price_cents: item.unit_price_cents,
                        guidelines: item.guidelines.clone(),
                    })
                    .collect(),
                total_price_cents,
                declared_delivery_date,
            };

            match self.orders.create(new_order).await {
                Ok(order) => {
                    info!(
                        order_id = %order.id,
                        order_number = order.order_number,
                        total_price_cents,
                        "Order created"
                    );
                    return Ok(order);
                }
                Err(DbError::Conflict) => {
                    warn!(attempt, order_number, "Order number collision, reallocating");
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(OrderError::Conflict)
    }

    // =========================================================================
    // Status machine
    // =========================================================================

    /// Move a pending order into progress
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn mark_in_progress(&self, order_id: OrderId) -> Result<Order, OrderError> {
        let order = self.require_order(order_id).await?;

        if order.status != OrderStatus::Pending {
            return Err(OrderError::InvalidState {
                status: order.status,
            });
        }

        let moved = self
            .orders
            .transition_status(order_id, &[OrderStatus::Pending], OrderStatus::InProgress)
            .await?;
        if !moved {
            return self.invalid_state(order_id).await;
        }

        self.require_order(order_id).await
    }

    /// Complete an order, setting its actual delivery date and recording
    /// any final deliverables in the completion log
    ///
    /// The lifecycle freezes afterwards; only the payment axis may still
    /// move, through settlement.
    #[instrument(skip(self, attachments), fields(order_id = %order_id))]
    pub async fn mark_completed(
        &self,
        order_id: OrderId,
        actual_delivery_date: DateTime<Utc>,
        attachments: Vec<NewAttachment>,
    ) -> Result<Order, OrderError> {
        let order = self.require_order(order_id).await?;

        if order.status.is_terminal() {
            return Err(OrderError::InvalidState {
                status: order.status,
            });
        }

        let now = Utc::now();
        let attachments: Vec<Attachment> = attachments
            .into_iter()
            .map(|a| a.into_attachment(now))
            .collect();

        let moved = self
            .orders
            .complete(
                order_id,
                &[OrderStatus::Pending, OrderStatus::InProgress],
                actual_delivery_date,
                &attachments,
            )
            .await?;
        if !moved {
            return self.invalid_state(order_id).await;
        }

        info!(order_id = %order_id, "Order completed");
        self.require_order(order_id).await
    }

    /// Cancel an order; allowed from pending or in-progress only
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn cancel_order(&self, order_id: OrderId) -> Result<Order, OrderError> {
        let order = self.require_order(order_id).await?;

        if !order.status.cancellable() {
            return Err(OrderError::InvalidState {
                status: order.status,
            });
        }

        let moved = self
            .orders
            .transition_status(
                order_id,
                &[OrderStatus::Pending, OrderStatus::InProgress],
                OrderStatus::Cancelled,
            )
            .await?;
        if !moved {
            return self.invalid_state(order_id).await;
        }

        info!(order_id = %order_id, order_number = order.order_number, "Order cancelled");
        self.require_order(order_id).await
    }

    // =========================================================================
    // Attachments
    // =========================================================================

    /// Record a staff-delivered file
    ///
    /// Routing follows the file kind: on an open order, a singular kind
    /// (pdf/docx/image) replaces any previous delivery of that kind and
    /// `other` accumulates; on a completed order the file lands in the
    /// completion log instead. Cancelled orders take no deliveries.
    #[instrument(skip(self, file), fields(order_id = %order_id, filename = %file.filename))]
    pub async fn record_delivery(
        &self,
        order_id: OrderId,
        file: NewAttachment,
    ) -> Result<Order, OrderError> {
        let order = self.require_order(order_id).await?;

        if order.status == OrderStatus::Cancelled {
            return Err(OrderError::InvalidState {
                status: order.status,
            });
        }

        let attachment = file.into_attachment(Utc::now());

        if order.status == OrderStatus::Completed {
            self.orders
                .append_attachment(order_id, AttachmentLog::Completion, &attachment)
                .await?;
        } else if attachment.kind.is_singular() {
            self.orders.replace_delivery(order_id, &attachment).await?;
        } else {
            self.orders
                .append_attachment(order_id, AttachmentLog::Delivery, &attachment)
                .await?;
        }

        self.require_order(order_id).await
    }

    /// Record a customer-uploaded file; append-only, any status, no
    /// transition implied
    #[instrument(skip(self, file), fields(order_id = %order_id, filename = %file.filename))]
    pub async fn record_customer_upload(
        &self,
        order_id: OrderId,
        file: NewAttachment,
    ) -> Result<Order, OrderError> {
        self.require_order(order_id).await?;

        let attachment = file.into_attachment(Utc::now());
        self.orders
            .append_attachment(order_id, AttachmentLog::CustomerUpload, &attachment)
            .await?;

        self.require_order(order_id).await
    }

    /// Link the external invoicing-system reference
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn set_invoice_ref(
        &self,
        order_id: OrderId,
        invoice_ref: &str,
    ) -> Result<Order, OrderError> {
        self.require_order(order_id).await?;
        self.orders.set_invoice_ref(order_id, invoice_ref).await?;
        self.require_order(order_id).await
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Fetch an order by ID
    pub async fn get_order(&self, order_id: OrderId) -> Result<Order, OrderError> {
        self.require_order(order_id).await
    }

    /// List an account's orders, newest first
    pub async fn list_orders(&self, user_id: UserId, limit: i64) -> Result<Vec<Order>, OrderError> {
        let limit = limit.clamp(1, self.config.max_list_limit);
        Ok(self.orders.list_by_user(user_id, limit).await?)
    }

    async fn require_order(&self, order_id: OrderId) -> Result<Order, OrderError> {
        self.orders
            .find_by_id(order_id)
            .await?
            .ok_or(OrderError::OrderNotFound)
    }

    /// A compare-and-set lost the race; report the state that won
    async fn invalid_state(&self, order_id: OrderId) -> Result<Order, OrderError> {
        let order = self.require_order(order_id).await?;
        Err(OrderError::InvalidState {
            status: order.status,
        })
    }
}

impl<O: OrderRepository, S: SequenceRepository, U: UserRepository> std::fmt::Debug
    for OrderService<O, S, U>
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderService")
            .field("config", &self.config)
            .finish()
    }
}
