//! Authentication: password digests, session tokens, and extractors.
//!
//! This module provides:
//! - Salted iterated HMAC-SHA256 password digests
//! - HS256 session tokens carrying the account id and role
//! - `AuthUser` - any authenticated account
//! - `AdminAuth` - admin capability check at the entry to admin operations

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use omnihub_core::{Account, Role, UserId};

use crate::error::ApiError;
use crate::state::AppState;

type HmacSha256 = Hmac<Sha256>;

/// Iterations of the password digest chain.
const DIGEST_ROUNDS: u32 = 10_000;

// ============================================================================
// Password digests
// ============================================================================

/// Run the digest chain and return the MAC of the final round, ready to be
/// finalized (hashing) or verified against a stored digest (login).
fn digest_mac(password: &[u8], salt: &[u8]) -> HmacSha256 {
    let mut block = password.to_vec();
    for _ in 1..DIGEST_ROUNDS {
        let mut mac = HmacSha256::new_from_slice(salt).expect("HMAC accepts any key length");
        mac.update(&block);
        block = mac.finalize().into_bytes().to_vec();
    }
    let mut mac = HmacSha256::new_from_slice(salt).expect("HMAC accepts any key length");
    mac.update(&block);
    mac
}

/// Hash a password with a fresh random salt.
///
/// The stored format is `<salt-hex>$<digest-hex>`.
#[must_use]
pub fn hash_password(password: &str) -> String {
    let salt = uuid::Uuid::new_v4().into_bytes();
    let digest = digest_mac(password.as_bytes(), &salt).finalize().into_bytes();
    format!("{}${}", hex::encode(salt), hex::encode(digest))
}

/// Verify a password against a stored digest. Comparison is constant-time.
#[must_use]
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt_hex, digest_hex)) = stored.split_once('$') else {
        return false;
    };
    let (Ok(salt), Ok(expected)) = (hex::decode(salt_hex), hex::decode(digest_hex)) else {
        return false;
    };

    digest_mac(password.as_bytes(), &salt)
        .verify_slice(&expected)
        .is_ok()
}

// ============================================================================
// Session tokens
// ============================================================================

/// JWT claims for a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the account id.
    pub sub: String,
    /// Role at issue time.
    pub role: Role,
    /// Expiration time (unix seconds).
    pub exp: i64,
    /// Issued at (unix seconds).
    pub iat: i64,
}

/// Issue a session token for an account.
///
/// # Errors
///
/// Returns an internal error if signing fails.
pub fn issue_token(
    jwt_secret: &str,
    expiry_minutes: i64,
    account: &Account,
) -> Result<String, ApiError> {
    let now = Utc::now();
    let claims = Claims {
        sub: account.user_id.to_string(),
        role: account.role,
        exp: (now + Duration::minutes(expiry_minutes)).timestamp(),
        iat: now.timestamp(),
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("failed to sign token: {e}")))
}

/// Decode and validate a session token.
fn decode_token(token: &str, jwt_secret: &str) -> Result<Claims, ApiError> {
    jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| ApiError::Unauthorized)
}

/// Pull the bearer token out of the Authorization header.
fn bearer_token(parts: &Parts) -> Result<&str, ApiError> {
    parts
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthorized)
}

// ============================================================================
// Extractors
// ============================================================================

/// An authenticated account, extracted from the session token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The account id.
    pub user_id: UserId,
    /// Role carried by the token.
    pub role: Role,
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        state: &'life1 Arc<AppState>,
    ) -> ::core::pin::Pin<
        Box<
            dyn ::core::future::Future<Output = Result<Self, Self::Rejection>>
                + ::core::marker::Send
                + 'async_trait,
        >,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let token = bearer_token(parts)?;
            let claims = decode_token(token, &state.config.jwt_secret)?;

            let user_id = claims
                .sub
                .parse::<UserId>()
                .map_err(|_| ApiError::Unauthorized)?;

            Ok(AuthUser {
                user_id,
                role: claims.role,
            })
        })
    }
}

/// An authenticated administrator.
///
/// The capability check happens here, at the entry to admin operations: the
/// account is loaded from the store, so a demoted or suspended admin is
/// rejected even while holding an unexpired token.
#[derive(Debug, Clone)]
pub struct AdminAuth {
    /// The admin's account id.
    pub admin_id: UserId,
}

impl FromRequestParts<Arc<AppState>> for AdminAuth {
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        state: &'life1 Arc<AppState>,
    ) -> ::core::pin::Pin<
        Box<
            dyn ::core::future::Future<Output = Result<Self, Self::Rejection>>
                + ::core::marker::Send
                + 'async_trait,
        >,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let token = bearer_token(parts)?;
            let claims = decode_token(token, &state.config.jwt_secret)?;

            let user_id = claims
                .sub
                .parse::<UserId>()
                .map_err(|_| ApiError::Unauthorized)?;

            let account = state
                .store
                .get_account(&user_id)?
                .ok_or(ApiError::Unauthorized)?;

            if !account.is_active {
                return Err(ApiError::Suspended);
            }
            if !account.is_admin() {
                return Err(ApiError::Forbidden);
            }

            Ok(AdminAuth { admin_id: user_id })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_roundtrip() {
        let stored = hash_password("hunter22");
        assert!(verify_password("hunter22", &stored));
        assert!(!verify_password("hunter23", &stored));
    }

    #[test]
    fn salts_are_unique() {
        let a = hash_password("same");
        let b = hash_password("same");
        assert_ne!(a, b);
        assert!(verify_password("same", &a));
        assert!(verify_password("same", &b));
    }

    #[test]
    fn malformed_stored_digest_rejects() {
        assert!(!verify_password("x", "no-dollar-sign"));
        assert!(!verify_password("x", "zzzz$zzzz"));
    }

    #[test]
    fn token_roundtrip() {
        let account = Account::new(UserId::generate(), "a@example.com", "A", "digest");
        let token = issue_token("secret", 60, &account).unwrap();

        let claims = decode_token(&token, "secret").unwrap();
        assert_eq!(claims.sub, account.user_id.to_string());
        assert_eq!(claims.role, Role::User);
    }

    #[test]
    fn token_rejects_wrong_secret() {
        let account = Account::new(UserId::generate(), "a@example.com", "A", "digest");
        let token = issue_token("secret", 60, &account).unwrap();
        assert!(decode_token(&token, "other-secret").is_err());
    }

    #[test]
    fn expired_token_rejects() {
        let account = Account::new(UserId::generate(), "a@example.com", "A", "digest");
        let token = issue_token("secret", -10, &account).unwrap();
        assert!(decode_token(&token, "secret").is_err());
    }
}
