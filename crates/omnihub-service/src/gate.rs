//! The credit authorization gate.
//!
//! Every charged tool call passes through [`run_charged`], the single
//! checkpoint that orders authorization, the external call, and accounting:
//!
//! 1. Reject if the account is missing or suspended - no side effects.
//! 2. Reject if the balance doesn't cover the tool's cost - no external
//!    call, no rows.
//! 3. Run the adapter future, bounded by the configured timeout.
//! 4. On success, commit the debit plus one ledger entry plus one success
//!    usage record in a single store batch. On failure, append one failure
//!    usage record with zero charge and leave the balance untouched.
//!
//! The gate never retries the adapter; a failed call returns an error and the
//! caller may resubmit as an independent fresh attempt.

use std::future::Future;
use std::time::Duration;

use omnihub_core::{ToolKind, UserId};
use omnihub_store::{Store, StoreError};
use omnihub_tools::AdapterError;

use crate::error::ApiError;
use crate::state::AppState;

/// A successful, charged tool call.
#[derive(Debug)]
pub struct ToolReceipt<T> {
    /// The adapter's normalized result.
    pub outcome: T,
    /// Credits deducted for this call.
    pub credits_used: i64,
    /// Balance after the deduction.
    pub balance: i64,
}

/// Authorize, run, and account for one charged tool call.
///
/// `detail` is the request summary stored on the success usage record;
/// failures store the adapter error instead.
///
/// # Errors
///
/// - [`ApiError::NotFound`] if the account does not exist.
/// - [`ApiError::Suspended`] if the account is not active.
/// - [`ApiError::InsufficientCredits`] if the balance doesn't cover the cost.
/// - [`ApiError::Adapter`] if the external call fails or times out.
/// - [`ApiError::Internal`] if accounting writes fail after adapter success.
pub async fn run_charged<T, F>(
    state: &AppState,
    user_id: UserId,
    tool: ToolKind,
    detail: impl Into<String>,
    call: F,
) -> Result<ToolReceipt<T>, ApiError>
where
    F: Future<Output = Result<T, AdapterError>>,
{
    let account = state
        .store
        .get_account(&user_id)?
        .ok_or_else(|| ApiError::NotFound("Account not found".into()))?;

    if !account.is_active {
        return Err(ApiError::Suspended);
    }

    let cost = state.config.costs.cost_of(tool);
    if !account.has_sufficient_credits(cost) {
        return Err(ApiError::InsufficientCredits {
            balance: account.credits,
            required: cost,
        });
    }

    let timeout = Duration::from_secs(state.config.adapter_timeout_seconds);
    let outcome = match tokio::time::timeout(timeout, call).await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(err)) => {
            record_failure(state, user_id, tool, &err.to_string());
            return Err(ApiError::Adapter(err));
        }
        Err(_elapsed) => {
            record_failure(state, user_id, tool, "adapter timed out");
            return Err(ApiError::Adapter(AdapterError::Timeout));
        }
    };

    let detail = detail.into();
    let commit = state
        .store
        .commit_usage(&user_id, tool, cost, &detail)
        .map_err(|err| match err {
            // A concurrent debit consumed the balance between the precheck
            // and the commit. This call loses cleanly: no rows written.
            StoreError::InsufficientCredits { balance, required } => {
                ApiError::InsufficientCredits { balance, required }
            }
            other => {
                tracing::error!(
                    user_id = %user_id,
                    tool = %tool,
                    error = %other,
                    "persistence failure after adapter success - usage not recorded"
                );
                ApiError::from(other)
            }
        })?;

    tracing::info!(
        user_id = %user_id,
        tool = %tool,
        cost,
        balance = commit.new_balance,
        "tool usage committed"
    );

    Ok(ToolReceipt {
        outcome,
        credits_used: cost,
        balance: commit.new_balance,
    })
}

/// Append a failure usage record; the balance and ledger stay untouched.
fn record_failure(state: &AppState, user_id: UserId, tool: ToolKind, detail: &str) {
    tracing::warn!(user_id = %user_id, tool = %tool, detail, "tool adapter failed");
    if let Err(err) = state.store.record_usage_failure(&user_id, tool, detail) {
        tracing::error!(
            user_id = %user_id,
            tool = %tool,
            error = %err,
            "failed to append failure usage record"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use omnihub_core::{Account, UsageStatus};
    use omnihub_store::RocksStore;
    use tempfile::TempDir;

    use crate::config::ServiceConfig;

    fn test_state() -> (AppState, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(RocksStore::open(dir.path()).unwrap());
        let state = AppState::new(store, ServiceConfig::default());
        (state, dir)
    }

    fn seed_account(state: &AppState, credits: i64, active: bool) -> UserId {
        let user_id = UserId::generate();
        let mut account = Account::new(user_id, format!("{user_id}@example.com"), "Test", "d");
        account.credits = credits;
        account.is_active = active;
        state.store.create_account(&account).unwrap();
        user_id
    }

    #[tokio::test]
    async fn success_commits_debit_ledger_and_record() {
        let (state, _dir) = test_state();
        let user_id = seed_account(&state, 5, true);

        let receipt = run_charged(&state, user_id, ToolKind::YoutubeDownload, "vid-1", async {
            Ok::<_, AdapterError>("payload")
        })
        .await
        .unwrap();

        assert_eq!(receipt.outcome, "payload");
        assert_eq!(receipt.credits_used, 3);
        assert_eq!(receipt.balance, 2);

        let ledger = state.store.list_ledger(Some(&user_id), 10, 0).unwrap();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0].amount, -3);
        assert_eq!(ledger[0].balance_after, 2);

        let usage = state.store.list_usage(Some(&user_id), 10, 0).unwrap();
        assert_eq!(usage.len(), 1);
        assert_eq!(usage[0].credits_charged, 3);
        assert_eq!(usage[0].status, UsageStatus::Success);
        assert_eq!(usage[0].detail, "vid-1");
    }

    #[tokio::test]
    async fn adapter_failure_records_free_failure_row() {
        let (state, _dir) = test_state();
        let user_id = seed_account(&state, 5, true);

        let result = run_charged(&state, user_id, ToolKind::PhoneLookup, "p", async {
            Err::<(), _>(AdapterError::Upstream { status: 500 })
        })
        .await;

        assert!(matches!(result, Err(ApiError::Adapter(_))));

        // Balance untouched, no ledger entry, one failure record.
        let account = state.store.get_account(&user_id).unwrap().unwrap();
        assert_eq!(account.credits, 5);
        assert!(state.store.list_ledger(Some(&user_id), 10, 0).unwrap().is_empty());

        let usage = state.store.list_usage(Some(&user_id), 10, 0).unwrap();
        assert_eq!(usage.len(), 1);
        assert_eq!(usage[0].status, UsageStatus::Failure);
        assert_eq!(usage[0].credits_charged, 0);
    }

    #[tokio::test]
    async fn insufficient_credits_skips_adapter_and_rows() {
        let (state, _dir) = test_state();
        let user_id = seed_account(&state, 2, true);

        let mut adapter_ran = false;
        let result = run_charged(&state, user_id, ToolKind::YoutubeDownload, "v", async {
            adapter_ran = true;
            Ok::<_, AdapterError>(())
        })
        .await;

        assert!(matches!(
            result,
            Err(ApiError::InsufficientCredits {
                balance: 2,
                required: 3
            })
        ));
        assert!(!adapter_ran);
        assert!(state.store.list_usage(Some(&user_id), 10, 0).unwrap().is_empty());
    }

    #[tokio::test]
    async fn suspended_account_is_rejected_without_side_effects() {
        let (state, _dir) = test_state();
        let user_id = seed_account(&state, 100, false);

        let result = run_charged(&state, user_id, ToolKind::LiveTv, "ch", async {
            Ok::<_, AdapterError>(())
        })
        .await;

        assert!(matches!(result, Err(ApiError::Suspended)));
        assert_eq!(state.store.get_account(&user_id).unwrap().unwrap().credits, 100);
        assert!(state.store.list_usage(Some(&user_id), 10, 0).unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn slow_adapter_times_out_as_failure() {
        let (mut state, _dir) = test_state();
        state.config.adapter_timeout_seconds = 1;
        let user_id = seed_account(&state, 5, true);

        // Paused time auto-advances, so the 120s "upstream" loses to the 1s
        // gate timeout without the test actually waiting.
        let result = run_charged(&state, user_id, ToolKind::PhoneLookup, "p", async {
            tokio::time::sleep(Duration::from_secs(120)).await;
            Ok::<_, AdapterError>(())
        })
        .await;
        assert!(matches!(
            result,
            Err(ApiError::Adapter(AdapterError::Timeout))
        ));

        let account = state.store.get_account(&user_id).unwrap().unwrap();
        assert_eq!(account.credits, 5);
        let usage = state.store.list_usage(Some(&user_id), 10, 0).unwrap();
        assert_eq!(usage.len(), 1);
        assert_eq!(usage[0].status, UsageStatus::Failure);
    }

    #[tokio::test]
    async fn worked_example_from_the_accounting_model() {
        let (state, _dir) = test_state();
        let user_id = seed_account(&state, 0, true);
        let admin_id = seed_account(&state, 0, true);

        // Start at 5.
        state.store.adjust_credits(&user_id, 5, "seed", &admin_id).unwrap();

        // Call costing 3 succeeds: balance 2, one entry, one record.
        let receipt = run_charged(&state, user_id, ToolKind::YoutubeDownload, "v", async {
            Ok::<_, AdapterError>(())
        })
        .await
        .unwrap();
        assert_eq!(receipt.balance, 2);

        // Next call costing 3 fails with insufficient credits; nothing new.
        let result = run_charged(&state, user_id, ToolKind::YoutubeDownload, "v", async {
            Ok::<_, AdapterError>(())
        })
        .await;
        assert!(matches!(result, Err(ApiError::InsufficientCredits { .. })));
        assert_eq!(state.store.get_account(&user_id).unwrap().unwrap().credits, 2);
        assert_eq!(state.store.list_usage(Some(&user_id), 10, 0).unwrap().len(), 1);

        // Admin grants +10: balance 12, entry carries balance_after = 12.
        let change = state
            .store
            .adjust_credits(&user_id, 10, "top-up", &admin_id)
            .unwrap();
        assert_eq!(change.new_balance, 12);
        assert_eq!(change.entry.balance_after, 12);

        // Ledger sums to the stored balance.
        let ledger = state.store.list_ledger(Some(&user_id), 100, 0).unwrap();
        let sum: i64 = ledger.iter().map(|e| e.amount).sum();
        assert_eq!(sum, 12);
    }
}
