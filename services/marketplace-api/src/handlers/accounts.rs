//! Account handlers

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::instrument;
use uuid::Uuid;

use wordforge_types::{Account, BillingProfile, NotificationPrefs, UserId};

use crate::error::ApiResult;
use crate::handlers::shared::record_op_duration;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    /// Pre-hashed by the auth layer; never a plaintext password
    pub password_hash: String,
}

#[derive(Debug, Deserialize)]
pub struct BillingProfileRequest {
    pub company_name: Option<String>,
    pub tax_id: Option<String>,
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub building_no: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NotificationPrefsRequest {
    pub order_updates: bool,
    pub payment_receipts: bool,
    pub marketing: bool,
}

#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub id: String,
    pub email: String,
    pub role: String,
    pub verified: bool,
    pub balance_cents: i64,
    pub total_spent_cents: i64,
    pub billing: BillingProfile,
    pub notifications: NotificationPrefs,
    pub created_at: String,
}

pub(crate) fn account_to_response(account: Account) -> AccountResponse {
    AccountResponse {
        id: account.id.to_string(),
        email: account.email,
        role: account.role.to_string(),
        verified: account.verified,
        balance_cents: account.balance_cents,
        total_spent_cents: account.total_spent_cents,
        billing: account.billing,
        notifications: account.notifications,
        created_at: account.created_at.to_rfc3339(),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/accounts
#[instrument(skip(state, req), fields(email = %req.email))]
pub async fn register_account(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<AccountResponse>> {
    let start = Instant::now();

    let account = state
        .accounts
        .register_account(&req.email, &req.password_hash)
        .await?;

    metrics::counter!("marketplace_accounts_registered_total").increment(1);
    record_op_duration("register_account", start, true);

    Ok(Json(account_to_response(account)))
}

/// GET /api/v1/accounts/:id
#[instrument(skip(state), fields(user_id = %user_id))]
pub async fn get_account(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<AccountResponse>> {
    let start = Instant::now();

    let account = state.accounts.get_account(UserId(user_id)).await?;

    record_op_duration("get_account", start, true);

    Ok(Json(account_to_response(account)))
}

/// PUT /api/v1/accounts/:id/billing
#[instrument(skip(state, req), fields(user_id = %user_id))]
pub async fn update_billing_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<BillingProfileRequest>,
) -> ApiResult<Json<AccountResponse>> {
    let start = Instant::now();

    let profile = BillingProfile {
        company_name: req.company_name,
        tax_id: req.tax_id,
        address: req.address,
        postal_code: req.postal_code,
        city: req.city,
        building_no: req.building_no,
    };
    let account = state
        .accounts
        .update_billing_profile(UserId(user_id), profile)
        .await?;

    record_op_duration("update_billing_profile", start, true);

    Ok(Json(account_to_response(account)))
}

/// PUT /api/v1/accounts/:id/notifications
#[instrument(skip(state, req), fields(user_id = %user_id))]
pub async fn update_notification_prefs(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<NotificationPrefsRequest>,
) -> ApiResult<Json<AccountResponse>> {
    let start = Instant::now();

    let prefs = NotificationPrefs {
        order_updates: req.order_updates,
        payment_receipts: req.payment_receipts,
        marketing: req.marketing,
    };
    let account = state
        .accounts
        .update_notification_prefs(UserId(user_id), prefs)
        .await?;

    record_op_duration("update_notification_prefs", start, true);

    Ok(Json(account_to_response(account)))
}
