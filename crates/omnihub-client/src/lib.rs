//! Client SDK for the OmniHub service.
//!
//! Wraps the HTTP API: login, account info, usage history, and tool calls,
//! with bearer-token plumbing and typed errors.
//!
//! # Example
//!
//! ```no_run
//! use omnihub_client::OmniHubClient;
//!
//! # async fn example() -> Result<(), omnihub_client::ClientError> {
//! let mut client = OmniHubClient::new("http://localhost:8080");
//! client.login("user@example.com", "password123").await?;
//!
//! let me = client.me().await?;
//! println!("balance: {}", me.credits);
//!
//! let report = client.phone_lookup("0300-1234567").await?;
//! println!("charged {} credits", report.credits_used);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod client;
pub mod error;
pub mod types;

pub use client::{ClientOptions, OmniHubClient};
pub use error::ClientError;
pub use types::{
    LedgerEntryView, LedgerPage, PhoneLookupResult, TokenGrant, UsageLogView, UsagePage, UserView,
};
