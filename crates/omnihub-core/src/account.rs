//! Account types for OmniHub.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::UserId;

/// A user account.
///
/// The account tracks identity, role, credit balance, and the active flag.
/// Balance is a non-negative integer number of credits; all mutation goes
/// through the store so the invariant holds under concurrency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// The user ID.
    pub user_id: UserId,

    /// Unique email address, used for login.
    pub email: String,

    /// Display name.
    pub name: String,

    /// Role of this account.
    pub role: Role,

    /// Current credit balance. Never negative.
    pub credits: i64,

    /// Whether the account may use tools. Suspended accounts have this false.
    pub is_active: bool,

    /// Salted password digest. Never serialized into API responses.
    pub password_digest: String,

    /// When the account was created.
    pub created_at: DateTime<Utc>,

    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new active user account with zero credits.
    #[must_use]
    pub fn new(
        user_id: UserId,
        email: impl Into<String>,
        name: impl Into<String>,
        password_digest: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            email: email.into(),
            name: name.into(),
            role: Role::User,
            credits: 0,
            is_active: true,
            password_digest: password_digest.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Check whether the balance covers a deduction of `cost` credits.
    #[must_use]
    pub fn has_sufficient_credits(&self, cost: i64) -> bool {
        self.credits >= cost
    }

    /// Check whether this account holds the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular user: may call tools, sees only their own logs.
    User,

    /// Administrator: may grant or deduct credits, suspend accounts,
    /// and read logs across all accounts.
    Admin,
}

impl Role {
    /// Get the role name as a string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_account_defaults() {
        let account = Account::new(UserId::generate(), "a@example.com", "A", "digest");
        assert_eq!(account.credits, 0);
        assert_eq!(account.role, Role::User);
        assert!(account.is_active);
        assert!(!account.is_admin());
    }

    #[test]
    fn sufficient_credits_boundary() {
        let mut account = Account::new(UserId::generate(), "a@example.com", "A", "digest");
        account.credits = 3;

        assert!(account.has_sufficient_credits(2));
        assert!(account.has_sufficient_credits(3));
        assert!(!account.has_sufficient_credits(4));
    }

    #[test]
    fn role_serde_snake_case() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        let role: Role = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(role, Role::User);
    }
}
