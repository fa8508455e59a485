//! Order handlers

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::instrument;
use uuid::Uuid;

use wordforge_orders_core::{NewAttachment, OrderItemSpec};
use wordforge_types::{Attachment, Order, OrderId};

use crate::error::{ApiError, ApiResult};
use crate::handlers::shared::{parse_timestamp, parse_user_id, record_op_duration};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub user_id: String,
    pub items: Vec<OrderItemRequest>,
    /// RFC 3339 timestamp
    pub declared_delivery_date: String,
}

#[derive(Debug, Deserialize)]
pub struct OrderItemRequest {
    pub topic: String,
    pub length_words: i32,
    pub content_type: String,
    pub language: String,
    pub unit_price_cents: i64,
    pub guidelines: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListOrdersParams {
    pub user_id: String,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct AttachmentRequest {
    pub filename: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct CompleteOrderRequest {
    /// RFC 3339 timestamp
    pub actual_delivery_date: String,
    #[serde(default)]
    pub attachments: Vec<AttachmentRequest>,
}

#[derive(Debug, Deserialize)]
pub struct InvoiceRefRequest {
    pub invoice_ref: String,
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub order_number: i64,
    pub user_id: String,
    pub items: Vec<OrderItemResponse>,
    pub total_price_cents: i64,
    pub status: String,
    pub payment_status: String,
    pub declared_delivery_date: String,
    pub actual_delivery_date: Option<String>,
    pub deliveries: Vec<AttachmentResponse>,
    pub completion_deliveries: Vec<AttachmentResponse>,
    pub customer_uploads: Vec<AttachmentResponse>,
    pub invoice_ref: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct OrderItemResponse {
    pub item_number: i64,
    pub topic: String,
    pub length_words: i32,
    pub content_type: String,
    pub language: String,
    pub unit_price_cents: i64,
    pub guidelines: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AttachmentResponse {
    pub filename: String,
    pub url: String,
    pub kind: String,
    pub uploaded_at: String,
}

#[derive(Debug, Serialize)]
pub struct ListOrdersResponse {
    pub orders: Vec<OrderResponse>,
}

fn attachment_to_response(a: Attachment) -> AttachmentResponse {
    AttachmentResponse {
        filename: a.filename,
        url: a.url,
        kind: a.kind.to_string(),
        uploaded_at: a.uploaded_at.to_rfc3339(),
    }
}

fn order_to_response(order: Order) -> OrderResponse {
    OrderResponse {
        id: order.id.to_string(),
        order_number: order.order_number,
        user_id: order.user_id.to_string(),
        items: order
            .items
            .into_iter()
            .map(|i| OrderItemResponse {
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
        status: order.status.to_string(),
        payment_status: order.payment_status.to_string(),
        declared_delivery_date: order.declared_delivery_date.to_rfc3339(),
        actual_delivery_date: order.actual_delivery_date.map(|t| t.to_rfc3339()),
        deliveries: order
            .deliveries
            .into_iter()
            .map(attachment_to_response)
            .collect(),
        completion_deliveries: order
            .completion_deliveries
            .into_iter()
            .map(attachment_to_response)
            .collect(),
        customer_uploads: order
            .customer_uploads
            .into_iter()
            .map(attachment_to_response)
            .collect(),
        invoice_ref: order.invoice_ref,
        created_at: order.created_at.to_rfc3339(),
    }
}

fn attachment_input(req: AttachmentRequest) -> Result<NewAttachment, ApiError> {
    if req.filename.trim().is_empty() || req.url.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Attachment filename and url are required".to_string(),
        ));
    }
    Ok(NewAttachment {
        filename: req.filename,
        url: req.url,
    })
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/orders
#[instrument(skip(state, req), fields(user_id = %req.user_id, item_count = req.items.len()))]
pub async fn create_order(
    State(state): State<AppState>,
    Json(req): Json<CreateOrderRequest>,
) -> ApiResult<Json<OrderResponse>> {
    let start = Instant::now();

    let user_id = parse_user_id(&req.user_id)?;
    let declared = parse_timestamp(&req.declared_delivery_date, "declared_delivery_date")?;

    let items: Vec<OrderItemSpec> = req
        .items
        .into_iter()
        .map(|i| OrderItemSpec {
            topic: i.topic,
            length_words: i.length_words,
            content_type: i.content_type,
            language: i.language,
            unit_price_cents: i.unit_price_cents,
            guidelines: i.guidelines,
        })
        .collect();

    let order = state.orders.create_order(user_id, items, declared).await?;

    metrics::counter!("marketplace_orders_created_total").increment(1);
    record_op_duration("create_order", start, true);

    tracing::info!(order_number = order.order_number, "Order created");

    Ok(Json(order_to_response(order)))
}

/// GET /api/v1/orders/:id
#[instrument(skip(state), fields(order_id = %order_id))]
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> ApiResult<Json<OrderResponse>> {
    let start = Instant::now();

    let order = state.orders.get_order(OrderId(order_id)).await?;

    record_op_duration("get_order", start, true);

    Ok(Json(order_to_response(order)))
}

/// GET /api/v1/orders
#[instrument(skip(state, params), fields(user_id = %params.user_id))]
pub async fn list_orders(
    State(state): State<AppState>,
    Query(params): Query<ListOrdersParams>,
) -> ApiResult<Json<ListOrdersResponse>> {
    let start = Instant::now();

    let user_id = parse_user_id(&params.user_id)?;
    let orders = state
        .orders
        .list_orders(user_id, params.limit.unwrap_or(20))
        .await?;

    record_op_duration("list_orders", start, true);

    Ok(Json(ListOrdersResponse {
        orders: orders.into_iter().map(order_to_response).collect(),
    }))
}

/// POST /api/v1/orders/:id/progress
#[instrument(skip(state), fields(order_id = %order_id))]
pub async fn mark_in_progress(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> ApiResult<Json<OrderResponse>> {
    let start = Instant::now();

    let order = state.orders.mark_in_progress(OrderId(order_id)).await?;

    record_op_duration("mark_in_progress", start, true);

    Ok(Json(order_to_response(order)))
}

/// POST /api/v1/orders/:id/complete
#[instrument(skip(state, req), fields(order_id = %order_id))]
pub async fn complete_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(req): Json<CompleteOrderRequest>,
) -> ApiResult<Json<OrderResponse>> {
    let start = Instant::now();

    let actual = parse_timestamp(&req.actual_delivery_date, "actual_delivery_date")?;
    let attachments = req
        .attachments
        .into_iter()
        .map(attachment_input)
        .collect::<Result<Vec<_>, _>>()?;

    let order = state
        .orders
        .mark_completed(OrderId(order_id), actual, attachments)
        .await?;

    metrics::counter!("marketplace_orders_completed_total").increment(1);
    record_op_duration("complete_order", start, true);

    Ok(Json(order_to_response(order)))
}

/// POST /api/v1/orders/:id/cancel
#[instrument(skip(state), fields(order_id = %order_id))]
pub async fn cancel_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> ApiResult<Json<OrderResponse>> {
    let start = Instant::now();

    let order = state.orders.cancel_order(OrderId(order_id)).await?;

    metrics::counter!("marketplace_orders_cancelled_total").increment(1);
    record_op_duration("cancel_order", start, true);

    Ok(Json(order_to_response(order)))
}

/// POST /api/v1/orders/:id/deliveries
#[instrument(skip(state, req), fields(order_id = %order_id, filename = %req.filename))]
pub async fn record_delivery(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(req): Json<AttachmentRequest>,
) -> ApiResult<Json<OrderResponse>> {
    let start = Instant::now();

    let file = attachment_input(req)?;
    let order = state
        .orders
        .record_delivery(OrderId(order_id), file)
        .await?;

    record_op_duration("record_delivery", start, true);

    Ok(Json(order_to_response(order)))
}

/// POST /api/v1/orders/:id/uploads
#[instrument(skip(state, req), fields(order_id = %order_id, filename = %req.filename))]
pub async fn record_customer_upload(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(req): Json<AttachmentRequest>,
) -> ApiResult<Json<OrderResponse>> {
    let start = Instant::now();

    let file = attachment_input(req)?;
    let order = state
        .orders
        .record_customer_upload(OrderId(order_id), file)
        .await?;

    record_op_duration("record_customer_upload", start, true);

    Ok(Json(order_to_response(order)))
}

/// PUT /api/v1/orders/:id/invoice
#[instrument(skip(state, req), fields(order_id = %order_id))]
pub async fn set_invoice_ref(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(req): Json<InvoiceRefRequest>,
) -> ApiResult<Json<OrderResponse>> {
    let start = Instant::now();

    if req.invoice_ref.trim().is_empty() {
        return Err(ApiError::BadRequest("invoice_ref is required".to_string()));
    }

    let order = state
        .orders
        .set_invoice_ref(OrderId(order_id), &req.invoice_ref)
        .await?;

    record_op_duration("set_invoice_ref", start, true);

    Ok(Json(order_to_response(order)))
}
