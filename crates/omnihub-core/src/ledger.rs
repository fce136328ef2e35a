//! Ledger entry types.
//!
//! Every change to an account balance produces exactly one ledger entry.
//! Entries are append-only; summing `amount` over an account's entries from
//! zero reconstructs the balance held in the account store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{EntryId, ToolKind, UserId};

/// An immutable record of a single balance change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Unique entry ID (ULID for time-ordering).
    pub id: EntryId,

    /// The account whose balance changed.
    pub user_id: UserId,

    /// Signed amount in credits. Positive = grant, negative = deduction.
    pub amount: i64,

    /// Balance after applying `amount`.
    pub balance_after: i64,

    /// Human-readable reason for the change.
    pub reason: String,

    /// Who caused the change.
    pub actor: Actor,

    /// When the entry was written.
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Create an entry for an admin credit adjustment (grant or deduction).
    #[must_use]
    pub fn adjustment(
        user_id: UserId,
        amount: i64,
        balance_after: i64,
        reason: String,
        admin_id: UserId,
    ) -> Self {
        Self {
            id: EntryId::generate(),
            user_id,
            amount,
            balance_after,
            reason,
            actor: Actor::Admin(admin_id),
            created_at: Utc::now(),
        }
    }

    /// Create an entry for a tool-usage deduction. The amount is always
    /// recorded as negative regardless of the sign of `cost`.
    #[must_use]
    pub fn usage(user_id: UserId, cost: i64, balance_after: i64, tool: ToolKind) -> Self {
        Self {
            id: EntryId::generate(),
            user_id,
            amount: -cost.abs(),
            balance_after,
            reason: format!("{} usage", tool.as_str()),
            actor: Actor::System,
            created_at: Utc::now(),
        }
    }
}

/// Who caused a balance change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Actor {
    /// An administrator, identified by their account id.
    Admin(UserId),

    /// The system itself, for tool-usage deductions.
    System,
}

impl Actor {
    /// Render the actor for display and log output.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Admin(id) => id.to_string(),
            Self::System => "system".to_string(),
        }
    }
}
