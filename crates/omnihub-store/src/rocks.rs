//! `RocksDB` storage implementation.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, Direction, IteratorMode,
    MultiThreaded, Options, WriteBatch,
};

use omnihub_core::{Account, LedgerEntry, RecordId, ToolKind, UsageRecord, UserId};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::{BalanceChange, Store, UsageCommit};

/// RocksDB-backed storage implementation.
///
/// Balance-affecting writes to one account are serialized through a
/// per-account lock table; operations on different accounts do not contend.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
    account_locks: Mutex<HashMap<UserId, Arc<Mutex<()>>>>,
    registration_lock: Mutex<()>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        tracing::debug!(
            column_families = all_column_families().len(),
            "opened RocksDB store"
        );

        Ok(Self {
            db: Arc::new(db),
            account_locks: Mutex::new(HashMap::new()),
            registration_lock: Mutex::new(()),
        })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Get the lock serializing writes to one account's record.
    fn account_lock(&self, user_id: &UserId) -> Arc<Mutex<()>> {
        let mut table = self
            .account_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        table.entry(*user_id).or_default().clone()
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Collect one user's index keys for a CF, newest first, then page them.
    fn page_user_index(
        &self,
        index_cf: &str,
        user_id: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<[u8; 16]>> {
        let cf = self.cf(index_cf)?;
        let prefix = keys::user_prefix(user_id);

        let iter = self
            .db
            .iterator_cf(&cf, IteratorMode::From(&prefix, Direction::Forward));

        // ULID suffixes are time-ordered, so a forward scan is oldest-first.
        let mut suffixes = Vec::new();
        for item in iter {
            let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            if !key.starts_with(&prefix) {
                break;
            }
            if let Some(bytes) = keys::ulid_suffix(&key) {
                suffixes.push(bytes);
            }
        }

        suffixes.reverse();
        Ok(suffixes.into_iter().skip(offset).take(limit).collect())
    }

    /// Page a ULID-keyed CF across all users, newest first.
    fn page_global<T: serde::de::DeserializeOwned>(
        &self,
        primary_cf: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<T>> {
        let cf = self.cf(primary_cf)?;
        let iter = self.db.iterator_cf(&cf, IteratorMode::End);

        let mut rows = Vec::new();
        for item in iter.skip(offset).take(limit) {
            let (_, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            rows.push(Self::deserialize(&value)?);
        }
        Ok(rows)
    }
}

impl Store for RocksStore {
    // =========================================================================
    // Account Operations
    // =========================================================================

    fn create_account(&self, account: &Account) -> Result<()> {
        // Serialize registrations so two concurrent signups can't both pass
        // the uniqueness check.
        let _guard = self
            .registration_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if self.get_account_by_email(&account.email)?.is_some() {
            return Err(StoreError::EmailTaken {
                email: account.email.clone(),
            });
        }

        let cf_accounts = self.cf(cf::ACCOUNTS)?;
        let cf_emails = self.cf(cf::ACCOUNTS_BY_EMAIL)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(
            &cf_accounts,
            keys::account_key(&account.user_id),
            Self::serialize(account)?,
        );
        batch.put_cf(
            &cf_emails,
            keys::email_key(&account.email),
            account.user_id.as_bytes(),
        );

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn put_account(&self, account: &Account) -> Result<()> {
        let cf = self.cf(cf::ACCOUNTS)?;
        self.db
            .put_cf(
                &cf,
                keys::account_key(&account.user_id),
                Self::serialize(account)?,
            )
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn get_account(&self, user_id: &UserId) -> Result<Option<Account>> {
        let cf = self.cf(cf::ACCOUNTS)?;

        self.db
            .get_cf(&cf, keys::account_key(user_id))
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn get_account_by_email(&self, email: &str) -> Result<Option<Account>> {
        let cf = self.cf(cf::ACCOUNTS_BY_EMAIL)?;

        let Some(id_bytes) = self
            .db
            .get_cf(&cf, keys::email_key(email))
            .map_err(|e| StoreError::Database(e.to_string()))?
        else {
            return Ok(None);
        };

        let mut bytes = [0u8; 16];
        if id_bytes.len() != 16 {
            return Err(StoreError::Database("corrupt email index entry".into()));
        }
        bytes.copy_from_slice(&id_bytes);

        self.get_account(&UserId::from_bytes(bytes))
    }

    fn list_accounts(&self, limit: usize, offset: usize) -> Result<Vec<Account>> {
        let cf = self.cf(cf::ACCOUNTS)?;
        let iter = self.db.iterator_cf(&cf, IteratorMode::Start);

        let mut accounts = Vec::new();
        for item in iter.skip(offset).take(limit) {
            let (_, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            accounts.push(Self::deserialize(&value)?);
        }
        Ok(accounts)
    }

    fn set_active(&self, user_id: &UserId, active: bool) -> Result<bool> {
        // Shares the account lock with balance ops so this read-modify-write
        // can't clobber a concurrent debit.
        let lock = self.account_lock(user_id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut account = self
            .get_account(user_id)?
            .ok_or_else(|| StoreError::account_not_found(user_id))?;

        if account.is_active == active {
            return Ok(false);
        }

        account.is_active = active;
        account.updated_at = chrono::Utc::now();
        self.put_account(&account)?;
        Ok(true)
    }

    // =========================================================================
    // Ledger Operations
    // =========================================================================

    fn adjust_credits(
        &self,
        user_id: &UserId,
        amount: i64,
        reason: &str,
        admin_id: &UserId,
    ) -> Result<BalanceChange> {
        let lock = self.account_lock(user_id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut account = self
            .get_account(user_id)?
            .ok_or_else(|| StoreError::account_not_found(user_id))?;

        let new_balance = account.credits + amount;
        if new_balance < 0 {
            return Err(StoreError::InsufficientCredits {
                balance: account.credits,
                required: amount.abs(),
            });
        }

        account.credits = new_balance;
        account.updated_at = chrono::Utc::now();

        let entry =
            LedgerEntry::adjustment(*user_id, amount, new_balance, reason.to_string(), *admin_id);

        let cf_accounts = self.cf(cf::ACCOUNTS)?;
        let cf_ledger = self.cf(cf::LEDGER)?;
        let cf_ledger_by_user = self.cf(cf::LEDGER_BY_USER)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(
            &cf_accounts,
            keys::account_key(user_id),
            Self::serialize(&account)?,
        );
        batch.put_cf(
            &cf_ledger,
            keys::ledger_key(&entry.id),
            Self::serialize(&entry)?,
        );
        batch.put_cf(&cf_ledger_by_user, keys::user_ledger_key(user_id, &entry.id), []);

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(BalanceChange { new_balance, entry })
    }

    fn list_ledger(
        &self,
        user_id: Option<&UserId>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<LedgerEntry>> {
        let Some(user_id) = user_id else {
            return self.page_global(cf::LEDGER, limit, offset);
        };

        let cf_ledger = self.cf(cf::LEDGER)?;
        let mut entries = Vec::new();
        for suffix in self.page_user_index(cf::LEDGER_BY_USER, user_id, limit, offset)? {
            let Some(data) = self
                .db
                .get_cf(&cf_ledger, suffix)
                .map_err(|e| StoreError::Database(e.to_string()))?
            else {
                continue;
            };
            entries.push(Self::deserialize(&data)?);
        }
        Ok(entries)
    }

    // =========================================================================
    // Usage Operations
    // =========================================================================

    fn commit_usage(
        &self,
        user_id: &UserId,
        tool: ToolKind,
        cost: i64,
        detail: &str,
    ) -> Result<UsageCommit> {
        let lock = self.account_lock(user_id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut account = self
            .get_account(user_id)?
            .ok_or_else(|| StoreError::account_not_found(user_id))?;

        if account.credits < cost {
            return Err(StoreError::InsufficientCredits {
                balance: account.credits,
                required: cost,
            });
        }

        account.credits -= cost;
        account.updated_at = chrono::Utc::now();

        let entry = LedgerEntry::usage(*user_id, cost, account.credits, tool);
        let record = UsageRecord::success(*user_id, tool, cost, detail.to_string());

        let cf_accounts = self.cf(cf::ACCOUNTS)?;
        let cf_ledger = self.cf(cf::LEDGER)?;
        let cf_ledger_by_user = self.cf(cf::LEDGER_BY_USER)?;
        let cf_usage = self.cf(cf::USAGE)?;
        let cf_usage_by_user = self.cf(cf::USAGE_BY_USER)?;

        // Debit, ledger entry, and usage record land in one batch: either
        // all three are visible or none are.
        let mut batch = WriteBatch::default();
        batch.put_cf(
            &cf_accounts,
            keys::account_key(user_id),
            Self::serialize(&account)?,
        );
        batch.put_cf(
            &cf_ledger,
            keys::ledger_key(&entry.id),
            Self::serialize(&entry)?,
        );
        batch.put_cf(&cf_ledger_by_user, keys::user_ledger_key(user_id, &entry.id), []);
        batch.put_cf(
            &cf_usage,
            keys::usage_key(&record.id),
            Self::serialize(&record)?,
        );
        batch.put_cf(&cf_usage_by_user, keys::user_usage_key(user_id, &record.id), []);

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(UsageCommit {
            new_balance: account.credits,
            entry,
            record,
        })
    }

    fn record_usage_failure(
        &self,
        user_id: &UserId,
        tool: ToolKind,
        detail: &str,
    ) -> Result<UsageRecord> {
        let record = UsageRecord::failure(*user_id, tool, detail.to_string());

        let cf_usage = self.cf(cf::USAGE)?;
        let cf_usage_by_user = self.cf(cf::USAGE_BY_USER)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(
            &cf_usage,
            keys::usage_key(&record.id),
            Self::serialize(&record)?,
        );
        batch.put_cf(&cf_usage_by_user, keys::user_usage_key(user_id, &record.id), []);

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(record)
    }

    fn list_usage(
        &self,
        user_id: Option<&UserId>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<UsageRecord>> {
        let Some(user_id) = user_id else {
            return self.page_global(cf::USAGE, limit, offset);
        };

        let cf_usage = self.cf(cf::USAGE)?;
        let mut records = Vec::new();
        for suffix in self.page_user_index(cf::USAGE_BY_USER, user_id, limit, offset)? {
            let record_id = RecordId::from_bytes(suffix);
            let Some(data) = self
                .db
                .get_cf(&cf_usage, keys::usage_key(&record_id))
                .map_err(|e| StoreError::Database(e.to_string()))?
            else {
                continue;
            };
            records.push(Self::deserialize(&data)?);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use omnihub_core::{Actor, UsageStatus};
    use tempfile::TempDir;

    fn create_test_store() -> (RocksStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = RocksStore::open(dir.path()).unwrap();
        (store, dir)
    }

    fn seed_account(store: &RocksStore, credits: i64) -> UserId {
        let user_id = UserId::generate();
        let mut account = Account::new(user_id, format!("{user_id}@example.com"), "Test", "digest");
        account.credits = credits;
        store.create_account(&account).unwrap();
        user_id
    }

    #[test]
    fn account_crud_and_email_index() {
        let (store, _dir) = create_test_store();
        let user_id = UserId::generate();
        let account = Account::new(user_id, "Person@Example.com", "Person", "digest");

        store.create_account(&account).unwrap();

        let by_id = store.get_account(&user_id).unwrap().unwrap();
        assert_eq!(by_id.email, "Person@Example.com");

        // Email lookup is case-insensitive.
        let by_email = store.get_account_by_email("person@example.COM").unwrap().unwrap();
        assert_eq!(by_email.user_id, user_id);

        // Duplicate registration is rejected.
        let dupe = Account::new(UserId::generate(), "person@example.com", "Other", "digest");
        assert!(matches!(
            store.create_account(&dupe),
            Err(StoreError::EmailTaken { .. })
        ));
    }

    #[test]
    fn set_active_is_idempotent() {
        let (store, _dir) = create_test_store();
        let user_id = seed_account(&store, 0);

        assert!(store.set_active(&user_id, false).unwrap());
        assert!(!store.set_active(&user_id, false).unwrap());
        assert!(!store.get_account(&user_id).unwrap().unwrap().is_active);

        assert!(store.set_active(&user_id, true).unwrap());
        assert!(store.get_account(&user_id).unwrap().unwrap().is_active);
    }

    #[test]
    fn set_active_missing_account() {
        let (store, _dir) = create_test_store();
        assert!(matches!(
            store.set_active(&UserId::generate(), false),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn adjust_credits_writes_ledger_entry() {
        let (store, _dir) = create_test_store();
        let user_id = seed_account(&store, 0);
        let admin_id = UserId::generate();

        let change = store.adjust_credits(&user_id, 10, "top-up", &admin_id).unwrap();
        assert_eq!(change.new_balance, 10);
        assert_eq!(change.entry.amount, 10);
        assert_eq!(change.entry.balance_after, 10);
        assert_eq!(change.entry.actor, Actor::Admin(admin_id));

        let account = store.get_account(&user_id).unwrap().unwrap();
        assert_eq!(account.credits, 10);
    }

    #[test]
    fn adjust_credits_rejects_below_zero() {
        let (store, _dir) = create_test_store();
        let user_id = seed_account(&store, 5);
        let admin_id = UserId::generate();

        let result = store.adjust_credits(&user_id, -7, "clawback", &admin_id);
        assert!(matches!(
            result,
            Err(StoreError::InsufficientCredits {
                balance: 5,
                required: 7
            })
        ));

        // Nothing written.
        assert_eq!(store.get_account(&user_id).unwrap().unwrap().credits, 5);
        assert!(store.list_ledger(Some(&user_id), 10, 0).unwrap().is_empty());
    }

    #[test]
    fn commit_usage_pairs_ledger_and_record() {
        let (store, _dir) = create_test_store();
        let user_id = seed_account(&store, 5);

        let commit = store
            .commit_usage(&user_id, ToolKind::YoutubeDownload, 3, "dQw4w9WgXcQ")
            .unwrap();

        assert_eq!(commit.new_balance, 2);
        assert_eq!(commit.entry.amount, -3);
        assert_eq!(commit.entry.balance_after, 2);
        assert_eq!(commit.entry.actor, Actor::System);
        assert_eq!(commit.record.credits_charged, 3);
        assert_eq!(commit.record.status, UsageStatus::Success);

        let ledger = store.list_ledger(Some(&user_id), 10, 0).unwrap();
        let usage = store.list_usage(Some(&user_id), 10, 0).unwrap();
        assert_eq!(ledger.len(), 1);
        assert_eq!(usage.len(), 1);
    }

    #[test]
    fn commit_usage_insufficient_writes_nothing() {
        let (store, _dir) = create_test_store();
        let user_id = seed_account(&store, 2);

        let result = store.commit_usage(&user_id, ToolKind::YoutubeDownload, 3, "x");
        assert!(matches!(
            result,
            Err(StoreError::InsufficientCredits {
                balance: 2,
                required: 3
            })
        ));

        assert_eq!(store.get_account(&user_id).unwrap().unwrap().credits, 2);
        assert!(store.list_ledger(Some(&user_id), 10, 0).unwrap().is_empty());
        assert!(store.list_usage(Some(&user_id), 10, 0).unwrap().is_empty());
    }

    #[test]
    fn failure_record_leaves_balance_and_ledger_untouched() {
        let (store, _dir) = create_test_store();
        let user_id = seed_account(&store, 5);

        let record = store
            .record_usage_failure(&user_id, ToolKind::PhoneLookup, "upstream timed out")
            .unwrap();
        assert_eq!(record.credits_charged, 0);
        assert_eq!(record.status, UsageStatus::Failure);

        assert_eq!(store.get_account(&user_id).unwrap().unwrap().credits, 5);
        assert!(store.list_ledger(Some(&user_id), 10, 0).unwrap().is_empty());
        assert_eq!(store.list_usage(Some(&user_id), 10, 0).unwrap().len(), 1);
    }

    #[test]
    fn ledger_reconstructs_balance() {
        let (store, _dir) = create_test_store();
        let user_id = seed_account(&store, 0);
        let admin_id = UserId::generate();

        store.adjust_credits(&user_id, 20, "grant", &admin_id).unwrap();
        store.commit_usage(&user_id, ToolKind::ImageEnhance, 2, "a").unwrap();
        store.commit_usage(&user_id, ToolKind::LiveTv, 1, "b").unwrap();
        store.adjust_credits(&user_id, -5, "clawback", &admin_id).unwrap();

        let account = store.get_account(&user_id).unwrap().unwrap();
        let ledger = store.list_ledger(Some(&user_id), 100, 0).unwrap();

        let sum: i64 = ledger.iter().map(|e| e.amount).sum();
        assert_eq!(sum, account.credits);
        assert_eq!(account.credits, 12);

        // Newest first: the most recent entry carries the final balance.
        assert_eq!(ledger[0].balance_after, account.credits);
    }

    #[test]
    fn listing_is_newest_first_with_pagination() {
        let (store, _dir) = create_test_store();
        let user_id = seed_account(&store, 100);

        for i in 0..5 {
            store
                .commit_usage(&user_id, ToolKind::TempEmail, 1, &format!("call-{i}"))
                .unwrap();
            // ULIDs within the same millisecond are not ordered between
            // themselves, so space the writes out.
            std::thread::sleep(std::time::Duration::from_millis(2));
        }

        let all = store.list_usage(Some(&user_id), 10, 0).unwrap();
        assert_eq!(all.len(), 5);
        assert_eq!(all[0].detail, "call-4");
        assert_eq!(all[4].detail, "call-0");

        let page = store.list_usage(Some(&user_id), 2, 1).unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].detail, "call-3");
        assert_eq!(page[1].detail, "call-2");
    }

    #[test]
    fn global_listing_spans_accounts() {
        let (store, _dir) = create_test_store();
        let first = seed_account(&store, 10);
        let second = seed_account(&store, 10);

        store.commit_usage(&first, ToolKind::LiveTv, 1, "one").unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
        store.commit_usage(&second, ToolKind::LiveTv, 1, "two").unwrap();

        let all = store.list_usage(None, 10, 0).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].detail, "two");
        assert_eq!(all[1].detail, "one");
    }

    #[test]
    fn concurrent_debits_never_overdraw() {
        let (store, _dir) = create_test_store();
        let store = Arc::new(store);
        let user_id = seed_account(&store, 10);

        // 8 racing debits of 3 against a balance of 10: exactly 3 may win.
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    store
                        .commit_usage(&user_id, ToolKind::YoutubeDownload, 3, &format!("race-{i}"))
                        .is_ok()
                })
            })
            .collect();

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();

        assert_eq!(successes, 3);

        let account = store.get_account(&user_id).unwrap().unwrap();
        assert_eq!(account.credits, 1);

        // One ledger entry and one usage record per winner, nothing else.
        assert_eq!(store.list_ledger(Some(&user_id), 100, 0).unwrap().len(), 3);
        assert_eq!(store.list_usage(Some(&user_id), 100, 0).unwrap().len(), 3);
    }
}
