//! `RocksDB` storage layer for OmniHub.
//!
//! This crate persists accounts, the credit ledger, and the tool-usage log
//! using `RocksDB` with column families for indexing.
//!
//! # Architecture
//!
//! - `accounts`: primary account records, keyed by `user_id`
//! - `accounts_by_email`: unique email index
//! - `ledger` / `ledger_by_user`: append-only ledger entries (ULID keys)
//! - `usage` / `usage_by_user`: append-only usage records (ULID keys)
//!
//! Ledger entries and usage records are never mutated or deleted. Compound
//! operations ([`Store::commit_usage`], [`Store::adjust_credits`]) write all
//! of their rows in a single `WriteBatch`, and every balance-affecting
//! operation on one account runs under that account's lock, so two
//! concurrent debits can never both observe a stale balance.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod rocks;
pub mod schema;

pub use error::{Result, StoreError};
pub use rocks::RocksStore;

use omnihub_core::{Account, LedgerEntry, ToolKind, UsageRecord, UserId};

/// Outcome of an admin credit adjustment.
#[derive(Debug, Clone)]
pub struct BalanceChange {
    /// Balance after the adjustment.
    pub new_balance: i64,
    /// The ledger entry that was written.
    pub entry: LedgerEntry,
}

/// Outcome of a committed (charged) tool usage.
#[derive(Debug, Clone)]
pub struct UsageCommit {
    /// Balance after the deduction.
    pub new_balance: i64,
    /// The ledger entry that was written (amount = -cost).
    pub entry: LedgerEntry,
    /// The usage record that was written.
    pub record: UsageRecord,
}

/// The storage trait defining all database operations.
///
/// Abstracts the storage layer so alternative backends can be swapped in.
pub trait Store: Send + Sync {
    // =========================================================================
    // Account Operations
    // =========================================================================

    /// Insert a new account, enforcing email uniqueness.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::EmailTaken` if the email is already registered.
    fn create_account(&self, account: &Account) -> Result<()>;

    /// Overwrite an existing account record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_account(&self, account: &Account) -> Result<()>;

    /// Get an account by user ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_account(&self, user_id: &UserId) -> Result<Option<Account>>;

    /// Get an account by email (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_account_by_email(&self, email: &str) -> Result<Option<Account>>;

    /// List accounts. Order is stable but arbitrary (by id bytes).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_accounts(&self, limit: usize, offset: usize) -> Result<Vec<Account>>;

    /// Set the active flag. Idempotent; returns whether the flag changed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the account doesn't exist.
    fn set_active(&self, user_id: &UserId, active: bool) -> Result<bool>;

    // =========================================================================
    // Ledger Operations
    // =========================================================================

    /// Apply a signed admin credit adjustment and append its ledger entry,
    /// atomically.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the account doesn't exist.
    /// - `StoreError::InsufficientCredits` if the adjustment would push the
    ///   balance below zero.
    fn adjust_credits(
        &self,
        user_id: &UserId,
        amount: i64,
        reason: &str,
        admin_id: &UserId,
    ) -> Result<BalanceChange>;

    /// List ledger entries, newest first. `None` scopes across all accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_ledger(
        &self,
        user_id: Option<&UserId>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<LedgerEntry>>;

    // =========================================================================
    // Usage Operations
    // =========================================================================

    /// Commit a charged tool usage: deduct `cost` credits and append one
    /// ledger entry plus one success usage record, all in one batch.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the account doesn't exist.
    /// - `StoreError::InsufficientCredits` if the balance doesn't cover
    ///   `cost` — in which case nothing is written.
    fn commit_usage(
        &self,
        user_id: &UserId,
        tool: ToolKind,
        cost: i64,
        detail: &str,
    ) -> Result<UsageCommit>;

    /// Append a failure usage record. The balance and ledger are untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn record_usage_failure(
        &self,
        user_id: &UserId,
        tool: ToolKind,
        detail: &str,
    ) -> Result<UsageRecord>;

    /// List usage records, newest first. `None` scopes across all accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_usage(
        &self,
        user_id: Option<&UserId>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<UsageRecord>>;
}
