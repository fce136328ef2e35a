//! Error types for OmniHub storage.

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Record not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of record that was missing.
        entity: &'static str,
        /// The identifier that was looked up.
        id: String,
    },

    /// Insufficient credits for a deduction.
    #[error("insufficient credits: balance={balance}, required={required}")]
    InsufficientCredits {
        /// Current balance.
        balance: i64,
        /// Credits the operation needed.
        required: i64,
    },

    /// An account with this email already exists.
    #[error("email already registered: {email}")]
    EmailTaken {
        /// The conflicting email address.
        email: String,
    },
}

impl StoreError {
    /// Shorthand for an account lookup miss.
    #[must_use]
    pub fn account_not_found(user_id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity: "account",
            id: user_id.to_string(),
        }
    }
}
