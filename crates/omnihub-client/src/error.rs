//! Client error types.

/// Errors that can occur when using the OmniHub client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned an error response.
    #[error("API error: {code} - {message}")]
    Api {
        /// Error code from the error envelope.
        code: String,
        /// Error message.
        message: String,
        /// HTTP status code.
        status: u16,
    },

    /// Credentials were rejected.
    #[error("unauthorized")]
    Unauthorized,

    /// The account is suspended.
    #[error("account suspended")]
    Suspended,

    /// Insufficient credits for the call.
    #[error("insufficient credits: balance={balance}, required={required}")]
    InsufficientCredits {
        /// Current balance.
        balance: i64,
        /// Required amount.
        required: i64,
    },

    /// A call that needs a session was made before `login`.
    #[error("not logged in")]
    NotLoggedIn,
}
