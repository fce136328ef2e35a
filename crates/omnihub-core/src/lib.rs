//! Core types for the OmniHub credit-gated tool platform.
//!
//! This crate provides the foundational types used throughout OmniHub:
//!
//! - **Identifiers**: [`UserId`], [`EntryId`], [`RecordId`]
//! - **Accounts**: [`Account`], [`Role`]
//! - **Ledger**: [`LedgerEntry`], [`Actor`]
//! - **Usage**: [`UsageRecord`], [`UsageStatus`], [`ToolKind`]
//! - **Costs**: [`CostTable`]
//!
//! # Credits
//!
//! A credit is the unit of consumption: every successful tool invocation
//! deducts that tool's fixed cost from the account balance. Balances are
//! stored as `i64` and are never negative. Every balance change has exactly
//! one corresponding [`LedgerEntry`], so summing a user's entries from zero
//! always reproduces their stored balance.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod account;
pub mod costs;
pub mod ids;
pub mod ledger;
pub mod usage;

pub use account::{Account, Role};
pub use costs::CostTable;
pub use ids::{EntryId, IdError, RecordId, UserId};
pub use ledger::{Actor, LedgerEntry};
pub use usage::{ToolKind, UnknownTool, UsageRecord, UsageStatus};
