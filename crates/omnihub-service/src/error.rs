//! API error types and responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use omnihub_tools::AdapterError;

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or invalid credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// Valid credentials but insufficient permissions.
    #[error("forbidden")]
    Forbidden,

    /// The account is suspended and may not use tools.
    #[error("account suspended")]
    Suspended,

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Bad request - invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Resource already exists or invalid state transition.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Insufficient credits for a tool call or deduction.
    #[error("insufficient credits: balance={balance}, required={required}")]
    InsufficientCredits {
        /// Current balance.
        balance: i64,
        /// Credits the operation needed.
        required: i64,
    },

    /// The external tool adapter failed.
    #[error("tool adapter failed: {0}")]
    Adapter(#[from] AdapterError),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                self.to_string(),
                None,
            ),
            Self::Forbidden => (StatusCode::FORBIDDEN, "forbidden", self.to_string(), None),
            Self::Suspended => (StatusCode::FORBIDDEN, "suspended", self.to_string(), None),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone(), None),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone(), None),
            Self::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone(), None),
            Self::InsufficientCredits { balance, required } => (
                StatusCode::PAYMENT_REQUIRED,
                "insufficient_credits",
                self.to_string(),
                Some(serde_json::json!({
                    "balance": balance,
                    "required": required
                })),
            ),
            Self::Adapter(err) => {
                let (status, code) = match err {
                    AdapterError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "invalid_input"),
                    AdapterError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
                    AdapterError::Unavailable(_) => {
                        (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
                    }
                    AdapterError::Timeout => (StatusCode::GATEWAY_TIMEOUT, "adapter_timeout"),
                    AdapterError::Upstream { .. } | AdapterError::Http(_) => {
                        (StatusCode::BAD_GATEWAY, "adapter_error")
                    }
                };
                (status, code, err.to_string(), None)
            }
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<omnihub_store::StoreError> for ApiError {
    fn from(err: omnihub_store::StoreError) -> Self {
        match err {
            omnihub_store::StoreError::NotFound { entity, id } => {
                Self::NotFound(format!("{entity} not found: {id}"))
            }
            omnihub_store::StoreError::InsufficientCredits { balance, required } => {
                Self::InsufficientCredits { balance, required }
            }
            omnihub_store::StoreError::EmailTaken { .. } => {
                Self::Conflict("Email already registered".into())
            }
            omnihub_store::StoreError::Database(msg)
            | omnihub_store::StoreError::Serialization(msg) => Self::Internal(msg),
        }
    }
}
