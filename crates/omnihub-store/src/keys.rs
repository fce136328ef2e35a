//! Key encoding for the column families.
//!
//! Ledger and usage keys embed ULIDs, which are time-ordered, so forward
//! iteration over a user prefix walks entries oldest-first.

use omnihub_core::{EntryId, RecordId, UserId};

/// Account key: the 16 UUID bytes.
#[must_use]
pub fn account_key(user_id: &UserId) -> Vec<u8> {
    user_id.as_bytes().to_vec()
}

/// Email index key: the lowercased email bytes.
#[must_use]
pub fn email_key(email: &str) -> Vec<u8> {
    email.to_lowercase().into_bytes()
}

/// Ledger primary key: the 16 ULID bytes.
#[must_use]
pub fn ledger_key(entry_id: &EntryId) -> Vec<u8> {
    entry_id.to_bytes().to_vec()
}

/// Ledger user-index key: `user_id (16 bytes) || entry_id (16 bytes)`.
#[must_use]
pub fn user_ledger_key(user_id: &UserId, entry_id: &EntryId) -> Vec<u8> {
    let mut key = Vec::with_capacity(32);
    key.extend_from_slice(user_id.as_bytes());
    key.extend_from_slice(&entry_id.to_bytes());
    key
}

/// Usage primary key: the 16 ULID bytes.
#[must_use]
pub fn usage_key(record_id: &RecordId) -> Vec<u8> {
    record_id.to_bytes().to_vec()
}

/// Usage user-index key: `user_id (16 bytes) || record_id (16 bytes)`.
#[must_use]
pub fn user_usage_key(user_id: &UserId, record_id: &RecordId) -> Vec<u8> {
    let mut key = Vec::with_capacity(32);
    key.extend_from_slice(user_id.as_bytes());
    key.extend_from_slice(&record_id.to_bytes());
    key
}

/// Prefix for iterating one user's index entries.
#[must_use]
pub fn user_prefix(user_id: &UserId) -> Vec<u8> {
    user_id.as_bytes().to_vec()
}

/// Extract the trailing 16 ULID bytes from a 32-byte user-index key.
///
/// Returns `None` if the key is shorter than 32 bytes.
#[must_use]
pub fn ulid_suffix(key: &[u8]) -> Option<[u8; 16]> {
    let tail = key.get(16..32)?;
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(tail);
    Some(bytes)
}
