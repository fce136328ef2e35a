//! OmniHub HTTP client implementation.

use reqwest::{Client, Response};
use std::time::Duration;

use crate::error::ClientError;
use crate::types::{
    ApiErrorResponse, LedgerPage, PhoneLookupResult, TokenGrant, UsagePage, UserView,
};

/// OmniHub API client.
///
/// Holds the session token obtained by [`OmniHubClient::login`]; calls that
/// need a session fail with [`ClientError::NotLoggedIn`] before it.
#[derive(Debug, Clone)]
pub struct OmniHubClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl OmniHubClient {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the OmniHub service
    ///   (e.g., `"http://omnihub:8080"`)
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_options(base_url, &ClientOptions::default())
    }

    /// Create a new client with custom options.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (should not happen with
    /// default settings).
    #[must_use]
    pub fn with_options(base_url: impl Into<String>, options: &ClientOptions) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Log in with email and password, storing the session token for
    /// subsequent calls.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the credentials are rejected.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<UserView, ClientError> {
        let url = format!("{}/api/auth/login", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        let grant: TokenGrant = Self::handle_response(response).await?;
        tracing::debug!(user_id = %grant.user.id, "logged in");
        self.token = Some(grant.access_token);
        Ok(grant.user)
    }

    /// Fetch the authenticated account, including the current balance.
    ///
    /// # Errors
    ///
    /// Returns an error if not logged in, the request fails, or the server
    /// returns an error.
    pub async fn me(&self) -> Result<UserView, ClientError> {
        let url = format!("{}/api/auth/me", self.base_url);
        let response = self.authed(self.client.get(&url))?.send().await?;
        Self::handle_response(response).await
    }

    /// Fetch a page of the account's usage history, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if not logged in, the request fails, or the server
    /// returns an error.
    pub async fn usage_history(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<UsagePage, ClientError> {
        let url = format!("{}/api/user/usage-history", self.base_url);
        let response = self
            .authed(self.client.get(&url))?
            .query(&[("limit", limit), ("offset", offset)])
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Fetch a page of the account's ledger, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if not logged in, the request fails, or the server
    /// returns an error.
    pub async fn ledger(&self, limit: usize, offset: usize) -> Result<LedgerPage, ClientError> {
        let url = format!("{}/api/user/ledger", self.base_url);
        let response = self
            .authed(self.client.get(&url))?
            .query(&[("limit", limit), ("offset", offset)])
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Run a charged phone lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InsufficientCredits`] when the balance doesn't
    /// cover the call, and the usual transport/API errors otherwise.
    pub async fn phone_lookup(&self, phone: &str) -> Result<PhoneLookupResult, ClientError> {
        let url = format!("{}/api/tools/phone-lookup", self.base_url);
        let response = self
            .authed(self.client.post(&url))?
            .json(&serde_json::json!({ "phone": phone }))
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Attach the bearer token to a request.
    fn authed(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder, ClientError> {
        let token = self.token.as_ref().ok_or(ClientError::NotLoggedIn)?;
        Ok(request.header("authorization", format!("Bearer {token}")))
    }

    /// Turn a response into a typed value or a typed error.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        match response.json::<ApiErrorResponse>().await {
            Ok(envelope) => {
                let body = envelope.error;
                match body.code.as_str() {
                    "unauthorized" => Err(ClientError::Unauthorized),
                    "suspended" => Err(ClientError::Suspended),
                    "insufficient_credits" => {
                        let field = |name: &str| {
                            body.details
                                .as_ref()
                                .and_then(|d| d.get(name))
                                .and_then(serde_json::Value::as_i64)
                                .unwrap_or(0)
                        };
                        Err(ClientError::InsufficientCredits {
                            balance: field("balance"),
                            required: field("required"),
                        })
                    }
                    _ => Err(ClientError::Api {
                        code: body.code,
                        message: body.message,
                        status: status.as_u16(),
                    }),
                }
            }
            Err(_) => Err(ClientError::Api {
                code: "unknown".to_string(),
                message: format!("HTTP {status}"),
                status: status.as_u16(),
            }),
        }
    }
}

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout in seconds (default: 30).
    pub timeout_seconds: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
        }
    }
}
