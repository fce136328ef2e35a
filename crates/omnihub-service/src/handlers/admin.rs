//! Admin operations: user management, credit adjustments, and audit logs.
//!
//! Every handler takes [`AdminAuth`], which performs the capability check
//! before any of this code runs.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use omnihub_core::UserId;
use omnihub_store::Store;

use super::{LedgerEntryResponse, PageQuery, UsageLogResponse};
use crate::auth::AdminAuth;
use crate::error::ApiError;
use crate::handlers::auth::UserResponse;
use crate::state::AppState;

/// Admin page size cap for log and user listings.
const ADMIN_PAGE_CAP: usize = 1000;

/// User listing response.
#[derive(Debug, Serialize)]
pub struct UsersResponse {
    /// The accounts.
    pub users: Vec<UserResponse>,
}

/// List all accounts.
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    _admin: AdminAuth,
    Query(page): Query<PageQuery>,
) -> Result<Json<UsersResponse>, ApiError> {
    let accounts = state
        .store
        .list_accounts(page.capped(ADMIN_PAGE_CAP), page.offset)?;

    Ok(Json(UsersResponse {
        users: accounts.iter().map(UserResponse::from).collect(),
    }))
}

/// Credit adjustment request.
#[derive(Debug, Deserialize)]
pub struct CreditUpdateRequest {
    /// Target account id.
    pub user_id: String,
    /// Signed amount: positive grants, negative deducts.
    pub amount: i64,
    /// Reason recorded on the ledger entry.
    pub reason: String,
}

/// Credit adjustment response.
#[derive(Debug, Serialize)]
pub struct CreditUpdateResponse {
    /// Confirmation message.
    pub message: String,
    /// Balance after the adjustment.
    pub new_balance: i64,
    /// Id of the ledger entry that was written.
    pub entry_id: String,
}

/// Grant or deduct credits. Deductions below zero are rejected, mirroring
/// the gate's own insufficient-credits rule.
pub async fn update_credits(
    State(state): State<Arc<AppState>>,
    admin: AdminAuth,
    Json(body): Json<CreditUpdateRequest>,
) -> Result<Json<CreditUpdateResponse>, ApiError> {
    let user_id = body
        .user_id
        .parse::<UserId>()
        .map_err(|_| ApiError::BadRequest("Invalid user ID".into()))?;

    let change = state
        .store
        .adjust_credits(&user_id, body.amount, &body.reason, &admin.admin_id)?;

    tracing::info!(
        user_id = %user_id,
        admin_id = %admin.admin_id,
        amount = body.amount,
        reason = %body.reason,
        new_balance = change.new_balance,
        "credits adjusted"
    );

    Ok(Json(CreditUpdateResponse {
        message: "Credits updated".into(),
        new_balance: change.new_balance,
        entry_id: change.entry.id.to_string(),
    }))
}

/// Suspension toggle response.
#[derive(Debug, Serialize)]
pub struct SuspendResponse {
    /// Confirmation message.
    pub message: String,
    /// Active state after the toggle.
    pub is_active: bool,
}

/// Toggle an account's active flag. Admin accounts cannot be suspended.
pub async fn suspend_user(
    State(state): State<Arc<AppState>>,
    admin: AdminAuth,
    Path(user_id): Path<String>,
) -> Result<Json<SuspendResponse>, ApiError> {
    let user_id = user_id
        .parse::<UserId>()
        .map_err(|_| ApiError::BadRequest("Invalid user ID".into()))?;

    let account = state
        .store
        .get_account(&user_id)?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    if account.is_admin() {
        return Err(ApiError::BadRequest("Cannot suspend admin".into()));
    }

    let now_active = !account.is_active;
    state.store.set_active(&user_id, now_active)?;

    tracing::info!(
        user_id = %user_id,
        admin_id = %admin.admin_id,
        is_active = now_active,
        "account active flag toggled"
    );

    Ok(Json(SuspendResponse {
        message: if now_active {
            "User unsuspended".into()
        } else {
            "User suspended".into()
        },
        is_active: now_active,
    }))
}

/// Admin usage log response.
#[derive(Debug, Serialize)]
pub struct AdminUsageLogsResponse {
    /// Usage records across all accounts, newest first.
    pub logs: Vec<UsageLogResponse>,
}

/// List usage records across all accounts, newest first.
pub async fn usage_logs(
    State(state): State<Arc<AppState>>,
    _admin: AdminAuth,
    Query(page): Query<PageQuery>,
) -> Result<Json<AdminUsageLogsResponse>, ApiError> {
    let records = state
        .store
        .list_usage(None, page.capped(ADMIN_PAGE_CAP), page.offset)?;

    Ok(Json(AdminUsageLogsResponse {
        logs: records.iter().map(UsageLogResponse::from).collect(),
    }))
}

/// Admin ledger response.
#[derive(Debug, Serialize)]
pub struct AdminCreditLogsResponse {
    /// Ledger entries across all accounts, newest first.
    pub logs: Vec<LedgerEntryResponse>,
}

/// List ledger entries across all accounts, newest first.
pub async fn credit_logs(
    State(state): State<Arc<AppState>>,
    _admin: AdminAuth,
    Query(page): Query<PageQuery>,
) -> Result<Json<AdminCreditLogsResponse>, ApiError> {
    let entries = state
        .store
        .list_ledger(None, page.capped(ADMIN_PAGE_CAP), page.offset)?;

    Ok(Json(AdminCreditLogsResponse {
        logs: entries.iter().map(LedgerEntryResponse::from).collect(),
    }))
}
