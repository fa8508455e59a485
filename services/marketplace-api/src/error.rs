//! Error types for the Marketplace API service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use wordforge_accounts_core::AccountError;
use wordforge_orders_core::OrderError;
use wordforge_payments_core::PaymentError;

/// API error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// API error type
#[derive(Debug, thiserror::Error)]
#[allow(dead_code)] // Variants used for future error handling
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Order error")]
    Order(#[from] OrderError),

    #[error("Payment error")]
    Payment(#[from] PaymentError),

    #[error("Account error")]
    Account(#[from] AccountError),

    #[error("Database error")]
    Database(#[from] wordforge_db::DbError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,

            Self::Order(e) => match e {
                OrderError::Validation(_) => StatusCode::BAD_REQUEST,
                OrderError::InvalidState { .. } => StatusCode::CONFLICT,
                OrderError::OrderNotFound | OrderError::AccountNotFound => StatusCode::NOT_FOUND,
                OrderError::Conflict => StatusCode::SERVICE_UNAVAILABLE,
                OrderError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },

            Self::Payment(e) => match e {
                PaymentError::Validation(_) | PaymentError::Webhook(_) => StatusCode::BAD_REQUEST,
                PaymentError::InvalidState { .. } | PaymentError::DuplicateSettlement { .. } => {
                    StatusCode::CONFLICT
                }
                e if e.is_not_found() => StatusCode::NOT_FOUND,
                PaymentError::Provider(_) => StatusCode::BAD_GATEWAY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },

            Self::Account(e) => match e {
                AccountError::InvalidEmail(_) => StatusCode::BAD_REQUEST,
                AccountError::EmailTaken => StatusCode::CONFLICT,
                AccountError::NotFound => StatusCode::NOT_FOUND,
                AccountError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },

            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "BAD_REQUEST",

            Self::Order(e) => match e {
                OrderError::Validation(_) => "VALIDATION_ERROR",
                OrderError::InvalidState { .. } => "INVALID_STATE",
                OrderError::OrderNotFound => "ORDER_NOT_FOUND",
                OrderError::AccountNotFound => "ACCOUNT_NOT_FOUND",
                OrderError::Conflict => "NUMBER_ALLOCATION_CONFLICT",
                OrderError::Database(_) => "INTERNAL_ERROR",
            },

            Self::Payment(e) => match e {
                PaymentError::Validation(_) => "VALIDATION_ERROR",
                PaymentError::InvalidState { .. } => "INVALID_STATE",
                PaymentError::DuplicateSettlement { .. } => "DUPLICATE_SETTLEMENT",
                PaymentError::PaymentNotFound => "PAYMENT_NOT_FOUND",
                PaymentError::OrderNotFound => "ORDER_NOT_FOUND",
                PaymentError::AccountNotFound => "ACCOUNT_NOT_FOUND",
                PaymentError::Provider(_) => "PROVIDER_ERROR",
                PaymentError::Webhook(_) => "WEBHOOK_ERROR",
                _ => "INTERNAL_ERROR",
            },

            Self::Account(e) => match e {
                AccountError::InvalidEmail(_) => "INVALID_EMAIL",
                AccountError::EmailTaken => "EMAIL_TAKEN",
                AccountError::NotFound => "ACCOUNT_NOT_FOUND",
                AccountError::Database(_) => "INTERNAL_ERROR",
            },

            Self::Database(_) | Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Order(e) => e.to_string(),
            Self::Payment(e) => e.to_string(),
            Self::Account(e) => e.to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        // A settlement arriving with a mismatched reference is a
        // reconciliation incident, not client noise.
        if matches!(self, Self::Payment(PaymentError::DuplicateSettlement { .. })) {
            tracing::error!(error = ?self, "Duplicate settlement reported to caller");
        } else if status.is_server_error() {
            tracing::error!(error = ?self, "Internal API error");
        }

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.message(),
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
