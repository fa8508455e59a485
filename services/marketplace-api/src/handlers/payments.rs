//! Payment handlers

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::instrument;
use uuid::Uuid;

use wordforge_types::{Payment, PaymentId, PaymentKind};

use crate::error::{ApiError, ApiResult};
use crate::handlers::shared::{parse_order_id, parse_user_id, record_op_duration};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct StartPaymentRequest {
    pub user_id: String,
    pub amount_cents: i64,
    /// "top_up" or "order_payment"
    pub kind: String,
    pub order_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StartPaymentResponse {
    pub payment: PaymentResponse,
    pub checkout_url: String,
}

#[derive(Debug, Deserialize)]
pub struct ListPaymentsParams {
    pub user_id: String,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub id: String,
    pub user_id: String,
    pub order_id: Option<String>,
    pub kind: String,
    pub status: String,
    pub amount_cents: i64,
    pub paid_cents: Option<i64>,
    pub discount_cents: i64,
    pub processor_session_id: Option<String>,
    pub failure_reason: Option<String>,
    pub created_at: String,
    pub completed_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListPaymentsResponse {
    pub payments: Vec<PaymentResponse>,
}

fn payment_to_response(payment: Payment) -> PaymentResponse {
    PaymentResponse {
        id: payment.id.to_string(),
        user_id: payment.user_id.to_string(),
        order_id: payment.order_id.map(|o| o.to_string()),
        kind: payment.kind.to_string(),
        status: payment.status.to_string(),
        amount_cents: payment.amount_cents,
        paid_cents: payment.paid_cents,
        discount_cents: payment.discount_cents,
        processor_session_id: payment.processor_session_id,
        failure_reason: payment.failure_reason,
        created_at: payment.created_at.to_rfc3339(),
        completed_at: payment.completed_at.map(|t| t.to_rfc3339()),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/payments
#[instrument(skip(state, req), fields(user_id = %req.user_id, kind = %req.kind, amount_cents = req.amount_cents))]
pub async fn start_payment(
    State(state): State<AppState>,
    Json(req): Json<StartPaymentRequest>,
) -> ApiResult<Json<StartPaymentResponse>> {
    let start = Instant::now();

    let user_id = parse_user_id(&req.user_id)?;
    let kind: PaymentKind = req
        .kind
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid kind: {}", req.kind)))?;
    let order_id = req
        .order_id
        .as_deref()
        .map(parse_order_id)
        .transpose()?;

    let started = state
        .payments
        .start_payment(user_id, req.amount_cents, kind, order_id)
        .await?;

    metrics::counter!("marketplace_payments_started_total", "kind" => kind.to_string())
        .increment(1);
    record_op_duration("start_payment", start, true);

    tracing::info!(payment_id = %started.payment.id, "Payment started");

    Ok(Json(StartPaymentResponse {
        payment: payment_to_response(started.payment),
        checkout_url: started.checkout_url,
    }))
}

/// GET /api/v1/payments/:id
#[instrument(skip(state), fields(payment_id = %payment_id))]
pub async fn get_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<Uuid>,
) -> ApiResult<Json<PaymentResponse>> {
    let start = Instant::now();

    let payment = state.payments.get_payment(PaymentId(payment_id)).await?;

    record_op_duration("get_payment", start, true);

    Ok(Json(payment_to_response(payment)))
}

/// GET /api/v1/payments
#[instrument(skip(state, params), fields(user_id = %params.user_id))]
pub async fn list_payments(
    State(state): State<AppState>,
    Query(params): Query<ListPaymentsParams>,
) -> ApiResult<Json<ListPaymentsResponse>> {
    let start = Instant::now();

    let user_id = parse_user_id(&params.user_id)?;
    let payments = state
        .payments
        .list_payments(user_id, params.limit.unwrap_or(20))
        .await?;

    record_op_duration("list_payments", start, true);

    Ok(Json(ListPaymentsResponse {
        payments: payments.into_iter().map(payment_to_response).collect(),
    }))
}
