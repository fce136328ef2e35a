//! Self-service log handlers: the caller's own usage history and ledger.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;

use omnihub_store::Store;

use super::{LedgerEntryResponse, PageQuery, UsageLogResponse};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Per-user page size cap for log listings.
const USER_PAGE_CAP: usize = 200;

/// Usage history response.
#[derive(Debug, Serialize)]
pub struct UsageHistoryResponse {
    /// Usage records, newest first.
    pub logs: Vec<UsageLogResponse>,
}

/// List the caller's usage history, newest first.
pub async fn usage_history(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Query(page): Query<PageQuery>,
) -> Result<Json<UsageHistoryResponse>, ApiError> {
    let records =
        state
            .store
            .list_usage(Some(&auth.user_id), page.capped(USER_PAGE_CAP), page.offset)?;

    Ok(Json(UsageHistoryResponse {
        logs: records.iter().map(UsageLogResponse::from).collect(),
    }))
}

/// Ledger history response.
#[derive(Debug, Serialize)]
pub struct LedgerHistoryResponse {
    /// Ledger entries, newest first.
    pub entries: Vec<LedgerEntryResponse>,
}

/// List the caller's ledger entries, newest first.
pub async fn ledger_history(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Query(page): Query<PageQuery>,
) -> Result<Json<LedgerHistoryResponse>, ApiError> {
    let entries =
        state
            .store
            .list_ledger(Some(&auth.user_id), page.capped(USER_PAGE_CAP), page.offset)?;

    Ok(Json(LedgerHistoryResponse {
        entries: entries.iter().map(LedgerEntryResponse::from).collect(),
    }))
}
