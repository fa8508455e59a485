//! Payment-processor webhook handler

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use std::time::Instant;

use wordforge_payments_core::PaymentError;

use crate::state::AppState;

/// POST /webhooks/payments
///
/// Handle processor callback events with signature verification.
pub async fn payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let start = Instant::now();

    // Extract processor signature header
    let Some(sig_header) = headers.get("stripe-signature") else {
        tracing::warn!("Missing Stripe-Signature header");
        return StatusCode::BAD_REQUEST;
    };

    let Ok(signature) = sig_header.to_str() else {
        tracing::warn!("Invalid Stripe-Signature header encoding");
        return StatusCode::BAD_REQUEST;
    };

    // Process webhook
    match state.payments.process_webhook(&body, signature).await {
        Ok(()) => {
            metrics::counter!("marketplace_webhooks_processed_total", "status" => "success")
                .increment(1);
            metrics::histogram!(
                "marketplace_operation_duration_seconds",
                "operation" => "process_webhook"
            )
            .record(start.elapsed().as_secs_f64());

            StatusCode::OK
        }
        Err(e) => {
            tracing::error!(error = ?e, "Webhook processing failed");
            metrics::counter!("marketplace_webhooks_processed_total", "status" => "error")
                .increment(1);

            match e {
                // Bad signatures and malformed payloads are the sender's
                // problem; settlement anomalies must not be retried by the
                // processor either.
                PaymentError::Webhook(_) | PaymentError::Validation(_) => StatusCode::BAD_REQUEST,
                PaymentError::DuplicateSettlement { .. } => StatusCode::CONFLICT,
                PaymentError::PaymentNotFound => StatusCode::NOT_FOUND,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            }
        }
    }
}
