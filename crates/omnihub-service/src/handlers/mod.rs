//! Request handlers.

pub mod account;
pub mod admin;
pub mod auth;
pub mod health;
pub mod tools;

use serde::{Deserialize, Serialize};

use omnihub_core::{LedgerEntry, UsageRecord};

/// Pagination query parameters shared by the log listing endpoints.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    /// Maximum number of rows to return.
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Rows to skip, for pagination.
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    50
}

impl PageQuery {
    /// Clamp the requested limit to a per-endpoint cap.
    #[must_use]
    pub fn capped(&self, cap: usize) -> usize {
        self.limit.min(cap)
    }
}

/// One usage record in API responses.
#[derive(Debug, Serialize)]
pub struct UsageLogResponse {
    /// Record ID.
    pub id: String,
    /// The account that invoked the tool.
    pub user_id: String,
    /// Tool identifier.
    pub tool: String,
    /// Credits charged (0 on failure).
    pub credits_used: i64,
    /// "success" or "failure".
    pub status: String,
    /// Free-text detail.
    pub detail: String,
    /// Timestamp (RFC 3339).
    pub created_at: String,
}

impl From<&UsageRecord> for UsageLogResponse {
    fn from(record: &UsageRecord) -> Self {
        Self {
            id: record.id.to_string(),
            user_id: record.user_id.to_string(),
            tool: record.tool.to_string(),
            credits_used: record.credits_charged,
            status: match record.status {
                omnihub_core::UsageStatus::Success => "success".into(),
                omnihub_core::UsageStatus::Failure => "failure".into(),
            },
            detail: record.detail.clone(),
            created_at: record.created_at.to_rfc3339(),
        }
    }
}

/// One ledger entry in API responses.
#[derive(Debug, Serialize)]
pub struct LedgerEntryResponse {
    /// Entry ID.
    pub id: String,
    /// The account whose balance changed.
    pub user_id: String,
    /// Signed amount (positive = grant).
    pub amount: i64,
    /// Balance after applying the amount.
    pub balance_after: i64,
    /// Reason for the change.
    pub reason: String,
    /// Acting admin id, or "system" for tool deductions.
    pub actor: String,
    /// Timestamp (RFC 3339).
    pub created_at: String,
}

impl From<&LedgerEntry> for LedgerEntryResponse {
    fn from(entry: &LedgerEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            user_id: entry.user_id.to_string(),
            amount: entry.amount,
            balance_after: entry.balance_after,
            reason: entry.reason.clone(),
            actor: entry.actor.label(),
            created_at: entry.created_at.to_rfc3339(),
        }
    }
}
