//! Registration, login, and session handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use omnihub_core::{Account, UserId};
use omnihub_store::Store;

use crate::auth::{hash_password, issue_token, verify_password, AuthUser};
use crate::error::ApiError;
use crate::state::AppState;

/// Public view of an account.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// Account id.
    pub id: String,
    /// Email address.
    pub email: String,
    /// Display name.
    pub name: String,
    /// "user" or "admin".
    pub role: String,
    /// Current credit balance.
    pub credits: i64,
    /// Whether the account is active.
    pub is_active: bool,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
}

impl From<&Account> for UserResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.user_id.to_string(),
            email: account.email.clone(),
            name: account.name.clone(),
            role: account.role.as_str().to_string(),
            credits: account.credits,
            is_active: account.is_active,
            created_at: account.created_at.to_rfc3339(),
        }
    }
}

/// Session token plus the account it belongs to.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    /// The signed session token.
    pub access_token: String,
    /// Always "bearer".
    pub token_type: &'static str,
    /// The authenticated account.
    pub user: UserResponse,
}

/// Registration request.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Email address (unique).
    pub email: String,
    /// Display name.
    pub name: String,
    /// Plaintext password.
    pub password: String,
}

/// Register a new account. Starts with zero credits and the user role.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let email = body.email.trim().to_string();
    if !email.contains('@') {
        return Err(ApiError::BadRequest("Invalid email address".into()));
    }
    if body.password.len() < 8 {
        return Err(ApiError::BadRequest(
            "Password must be at least 8 characters".into(),
        ));
    }

    if state.store.get_account_by_email(&email)?.is_some() {
        return Err(ApiError::Conflict("Email already registered".into()));
    }

    let account = Account::new(
        UserId::generate(),
        email,
        body.name.trim(),
        hash_password(&body.password),
    );
    state.store.create_account(&account)?;

    tracing::info!(user_id = %account.user_id, "account registered");

    let access_token = issue_token(
        &state.config.jwt_secret,
        state.config.token_expiry_minutes,
        &account,
    )?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer",
        user: UserResponse::from(&account),
    }))
}

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Authenticate with email and password.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let account = state
        .store
        .get_account_by_email(body.email.trim())?
        .ok_or(ApiError::Unauthorized)?;

    if !verify_password(&body.password, &account.password_digest) {
        return Err(ApiError::Unauthorized);
    }

    if !account.is_active {
        return Err(ApiError::Suspended);
    }

    let access_token = issue_token(
        &state.config.jwt_secret,
        state.config.token_expiry_minutes,
        &account,
    )?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer",
        user: UserResponse::from(&account),
    }))
}

/// Return the authenticated account.
pub async fn me(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    let account = state
        .store
        .get_account(&auth.user_id)?
        .ok_or_else(|| ApiError::NotFound("Account not found".into()))?;

    Ok(Json(UserResponse::from(&account)))
}
