//! Eyecon caller-id lookup adapter.
//!
//! The Eyecon upstream is flaky: auth headers expire, and it sometimes
//! answers with HTML instead of JSON. Those conditions degrade to a
//! "safe mode" report with empty names rather than an error, so the caller
//! still gets a well-formed (and charged) response; only transport failures
//! surface as adapter errors.

use reqwest::Client;
use serde::Serialize;

use crate::phone::sanitize_msisdn;
use crate::AdapterError;

/// Eyecon auth header values.
#[derive(Debug, Clone)]
pub struct EyeconAuth {
    /// `e-auth-v` header.
    pub auth_v: String,
    /// `e-auth` header.
    pub auth: String,
    /// `e-auth-c` header.
    pub auth_c: String,
    /// `e-auth-k` header.
    pub auth_k: String,
}

/// Normalized Eyecon lookup result.
#[derive(Debug, Clone, Serialize)]
pub struct EyeconReport {
    /// Always true: degraded upstreams still produce a report.
    pub success: bool,
    /// "live" when the upstream answered usable JSON, "safe" otherwise.
    pub mode: &'static str,
    /// The sanitized number that was queried.
    pub query: String,
    /// HTTP status the upstream answered with.
    pub status_code: u16,
    /// Names attached to the number, empty in safe mode.
    pub names: Vec<serde_json::Value>,
    /// Human-readable note for safe mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Whether auth headers were configured for this request.
    pub headers_configured: bool,
}

/// Adapter for the Eyecon name lookup API.
#[derive(Debug, Clone)]
pub struct EyeconLookup {
    client: Client,
    base_url: String,
    auth: Option<EyeconAuth>,
}

impl EyeconLookup {
    /// Create a new Eyecon adapter. `auth` may be absent; the upstream then
    /// usually answers 401 and the adapter reports safe mode.
    #[must_use]
    pub fn new(client: Client, base_url: &str, auth: Option<EyeconAuth>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        }
    }

    /// Look up the names registered for a phone number.
    ///
    /// # Errors
    ///
    /// Returns an error if the input has no digits or the transport fails.
    /// Upstream auth failures and unparseable bodies are not errors; they
    /// produce a safe-mode report.
    pub async fn lookup(&self, phone: &str) -> Result<EyeconReport, AdapterError> {
        let query = sanitize_msisdn(phone);
        if query.is_empty() {
            return Err(AdapterError::InvalidInput(
                "phone number contains no digits".into(),
            ));
        }

        let url = format!("{}/app/getnames.jsp", self.base_url);
        let mut request = self
            .client
            .get(&url)
            .header("accept", "application/json")
            .query(&[
                ("cli", query.as_str()),
                ("lang", "en"),
                ("is_callerid", "true"),
                ("is_ic", "true"),
                ("requestApi", "URLconnection"),
            ]);

        let headers_configured = self.auth.is_some();
        if let Some(auth) = &self.auth {
            request = request
                .header("e-auth-v", &auth.auth_v)
                .header("e-auth", &auth.auth)
                .header("e-auth-c", &auth.auth_c)
                .header("e-auth-k", &auth.auth_k);
        }

        let response = request.send().await?;
        let status = response.status();
        let status_code = status.as_u16();
        let body = response.text().await?;

        tracing::debug!(%query, status = status_code, body_len = body.len(), "eyecon answered");

        if status.is_success() {
            if let Ok(data) = serde_json::from_str::<serde_json::Value>(&body) {
                return Ok(EyeconReport {
                    success: true,
                    mode: "live",
                    query,
                    status_code,
                    names: extract_names(&data),
                    message: None,
                    headers_configured,
                });
            }
        }

        let message = if status_code == 401 || status_code == 403 {
            "Eyecon authentication failed - headers may be invalid or expired".to_string()
        } else {
            format!("Eyecon returned status {status_code}")
        };

        Ok(EyeconReport {
            success: true,
            mode: "safe",
            query,
            status_code,
            names: Vec::new(),
            message: Some(message),
            headers_configured,
        })
    }
}

/// Pull a name list out of whichever shape the upstream chose today.
fn extract_names(data: &serde_json::Value) -> Vec<serde_json::Value> {
    match data {
        serde_json::Value::Array(items) => items.clone(),
        serde_json::Value::Object(map) => {
            if let Some(serde_json::Value::Array(items)) = map.get("names").or_else(|| map.get("results")) {
                items.clone()
            } else if let Some(name) = map.get("name") {
                vec![serde_json::json!({ "name": name })]
            } else {
                Vec::new()
            }
        }
        _ => Vec::new(),
    }
}
