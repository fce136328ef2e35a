//! Response types for the OmniHub client.

use serde::Deserialize;

/// An account, as returned by the service.
#[derive(Debug, Clone, Deserialize)]
pub struct UserView {
    /// Account id.
    pub id: String,
    /// Email address.
    pub email: String,
    /// Display name.
    pub name: String,
    /// "user" or "admin".
    pub role: String,
    /// Current credit balance.
    pub credits: i64,
    /// Whether the account is active.
    pub is_active: bool,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
}

/// A session token plus the account it belongs to.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    /// The signed session token.
    pub access_token: String,
    /// Token type, always "bearer".
    pub token_type: String,
    /// The authenticated account.
    pub user: UserView,
}

/// One usage record.
#[derive(Debug, Clone, Deserialize)]
pub struct UsageLogView {
    /// Record id.
    pub id: String,
    /// Account that invoked the tool.
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

/// A page of usage records, newest first.
#[derive(Debug, Clone, Deserialize)]
pub struct UsagePage {
    /// The records.
    pub logs: Vec<UsageLogView>,
}

/// One ledger entry.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerEntryView {
    /// Entry id.
    pub id: String,
    /// Account whose balance changed.
    pub user_id: String,
    /// Signed amount.
    pub amount: i64,
    /// Balance after applying the amount.
    pub balance_after: i64,
    /// Reason for the change.
    pub reason: String,
    /// Acting admin id, or "system".
    pub actor: String,
    /// Timestamp (RFC 3339).
    pub created_at: String,
}

/// A page of ledger entries, newest first.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerPage {
    /// The entries.
    pub entries: Vec<LedgerEntryView>,
}

/// A phone lookup result with its accounting.
#[derive(Debug, Clone, Deserialize)]
pub struct PhoneLookupResult {
    /// Whether the upstream reported a hit.
    pub success: bool,
    /// Number of matching records.
    pub results_count: u64,
    /// Raw result records.
    pub results: Vec<serde_json::Value>,
    /// The sanitized number that was queried.
    pub query: String,
    /// Credits deducted for this call.
    pub credits_used: i64,
    /// Balance after the deduction.
    pub balance: i64,
}

/// The service's JSON error envelope.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}
