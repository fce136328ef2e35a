//! OmniHub HTTP API service.
//!
//! Exposes registration/login, the credit-gated tool endpoints, per-user log
//! queries, and admin operations over the store. The credit authorization
//! gate in [`gate`] is the single checkpoint every charged tool call passes
//! through.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod gate;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::ServiceConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
