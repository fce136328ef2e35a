//! Router configuration.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{account, admin, auth, health, tools};
use crate::state::AppState;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /health` - Health check
///
/// ## Auth
/// - `POST /api/auth/register` - Create an account
/// - `POST /api/auth/login` - Email + password login
/// - `GET /api/auth/me` - The authenticated account
///
/// ## User logs
/// - `GET /api/user/usage-history` - Own usage records, newest first
/// - `GET /api/user/ledger` - Own ledger entries, newest first
///
/// ## Tools (all gated; catalog/inbox/verify paths are free)
/// - `POST /api/tools/phone-lookup`
/// - `POST /api/tools/eyecon-lookup`
/// - `POST /api/tools/temp-email`
/// - `POST /api/tools/youtube-download`
/// - `POST /api/tools/image-enhance`
/// - `POST /api/tools/tamasha-otp`
/// - `GET /api/tools/live-tv/channels`
/// - `GET /api/tools/live-tv/channels/:category`
/// - `GET /api/tools/live-tv/stream/:channel_id`
///
/// ## Admin (capability-checked)
/// - `GET /api/admin/users`
/// - `POST /api/admin/credits`
/// - `POST /api/admin/users/:user_id/suspend`
/// - `GET /api/admin/usage-logs`
/// - `GET /api/admin/credit-logs`
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.cors_origins);
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    let state = Arc::new(state);

    Router::new()
        // Health (public)
        .route("/health", get(health::health))
        // Auth
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        // User logs
        .route("/api/user/usage-history", get(account::usage_history))
        .route("/api/user/ledger", get(account::ledger_history))
        // Tools
        .route("/api/tools/phone-lookup", post(tools::phone_lookup))
        .route("/api/tools/eyecon-lookup", post(tools::eyecon_lookup))
        .route("/api/tools/temp-email", post(tools::temp_email))
        .route("/api/tools/youtube-download", post(tools::youtube_download))
        .route("/api/tools/image-enhance", post(tools::image_enhance))
        .route("/api/tools/tamasha-otp", post(tools::tamasha_otp))
        .route("/api/tools/live-tv/channels", get(tools::tv_channels))
        .route(
            "/api/tools/live-tv/channels/:category",
            get(tools::tv_channels_by_category),
        )
        .route(
            "/api/tools/live-tv/stream/:channel_id",
            get(tools::tv_stream),
        )
        // Admin
        .route("/api/admin/users", get(admin::list_users))
        .route("/api/admin/credits", post(admin::update_credits))
        .route(
            "/api/admin/users/:user_id/suspend",
            post(admin::suspend_user),
        )
        .route("/api/admin/usage-logs", get(admin::usage_logs))
        .route("/api/admin/credit-logs", get(admin::credit_logs))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
