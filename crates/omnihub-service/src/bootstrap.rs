//! First-boot provisioning.

use omnihub_core::{Account, Role, UserId};
use omnihub_store::{Store, StoreError};

use crate::auth::hash_password;
use crate::config::ServiceConfig;

/// Ensure the bootstrap admin account exists.
///
/// Idempotent: if an account already holds the configured admin email,
/// nothing changes. The initial credit balance goes through the ledger so
/// the ledger/balance invariant holds from the first row.
///
/// # Errors
///
/// Returns an error if the store cannot be read or written.
pub fn ensure_admin(store: &dyn Store, config: &ServiceConfig) -> Result<(), StoreError> {
    if store.get_account_by_email(&config.admin_email)?.is_some() {
        return Ok(());
    }

    let mut account = Account::new(
        UserId::generate(),
        config.admin_email.clone(),
        "Super Admin",
        hash_password(&config.admin_password),
    );
    account.role = Role::Admin;
    store.create_account(&account)?;

    if config.admin_bootstrap_credits > 0 {
        store.adjust_credits(
            &account.user_id,
            config.admin_bootstrap_credits,
            "bootstrap grant",
            &account.user_id,
        )?;
    }

    tracing::info!(
        admin_id = %account.user_id,
        email = %config.admin_email,
        credits = config.admin_bootstrap_credits,
        "bootstrap admin created"
    );

    Ok(())
}
