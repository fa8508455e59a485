//! Helpers shared across handlers

use std::time::Instant;

use wordforge_types::{OrderId, UserId};

use crate::error::ApiError;

/// Record HTTP operation duration with result label
#[inline]
pub fn record_op_duration(operation: &'static str, start: Instant, success: bool) {
    let result = if success { "ok" } else { "err" };
    metrics::histogram!(
        "marketplace_operation_duration_seconds",
        "operation" => operation,
        "result" => result
    )
    .record(start.elapsed().as_secs_f64());
}

/// Parse an account ID out of request input
pub fn parse_user_id(s: &str) -> Result<UserId, ApiError> {
    UserId::parse(s).map_err(|_| ApiError::BadRequest("Invalid user_id".to_string()))
}

/// Parse an order ID out of request input
pub fn parse_order_id(s: &str) -> Result<OrderId, ApiError> {
    OrderId::parse(s).map_err(|_| ApiError::BadRequest("Invalid order_id".to_string()))
}

/// Parse an RFC 3339 timestamp out of request input
pub fn parse_timestamp(
    s: &str,
    field: &'static str,
) -> Result<chrono::DateTime<chrono::Utc>, ApiError> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&chrono::Utc))
        .map_err(|_| ApiError::BadRequest(format!("Invalid {field}: expected RFC 3339")))
}
