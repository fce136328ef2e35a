//! Column family definitions.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Primary account records, keyed by `user_id`.
    pub const ACCOUNTS: &str = "accounts";

    /// Unique email index: lowercased email bytes -> `user_id`.
    pub const ACCOUNTS_BY_EMAIL: &str = "accounts_by_email";

    /// Ledger entries, keyed by `entry_id` (ULID).
    pub const LEDGER: &str = "ledger";

    /// Index: ledger entries by user, keyed by `user_id || entry_id`.
    /// Value is empty (index only).
    pub const LEDGER_BY_USER: &str = "ledger_by_user";

    /// Usage records, keyed by `record_id` (ULID).
    pub const USAGE: &str = "usage";

    /// Index: usage records by user, keyed by `user_id || record_id`.
    /// Value is empty (index only).
    pub const USAGE_BY_USER: &str = "usage_by_user";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![
        cf::ACCOUNTS,
        cf::ACCOUNTS_BY_EMAIL,
        cf::LEDGER,
        cf::LEDGER_BY_USER,
        cf::USAGE,
        cf::USAGE_BY_USER,
    ]
}
