//! Phone database lookup adapter.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::AdapterError;

/// Normalize a phone number for the lookup APIs.
///
/// Strips every non-digit character and rewrites a leading `0` to the `92`
/// country prefix, the format both phone backends expect.
#[must_use]
pub fn sanitize_msisdn(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if let Some(rest) = digits.strip_prefix('0') {
        format!("92{rest}")
    } else {
        digits
    }
}

/// Normalized phone lookup result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhoneLookupReport {
    /// Whether the upstream reported a hit.
    #[serde(default)]
    pub success: bool,
    /// Number of matching records.
    #[serde(default)]
    pub results_count: u64,
    /// Raw result records from the upstream.
    #[serde(default)]
    pub results: Vec<serde_json::Value>,
    /// The sanitized number that was queried.
    #[serde(default)]
    pub query: String,
}

/// Adapter for the phone number database.
#[derive(Debug, Clone)]
pub struct PhoneLookup {
    client: Client,
    base_url: String,
}

impl PhoneLookup {
    /// Create a new phone lookup adapter.
    #[must_use]
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Look up a phone number. The input is sanitized before querying.
    ///
    /// # Errors
    ///
    /// Returns an error if the input has no digits, the upstream answers with
    /// a non-success status, or the transport fails.
    pub async fn lookup(&self, phone: &str) -> Result<PhoneLookupReport, AdapterError> {
        let query = sanitize_msisdn(phone);
        if query.is_empty() {
            return Err(AdapterError::InvalidInput(
                "phone number contains no digits".into(),
            ));
        }

        let url = format!("{}/api/lookup", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("query", query.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AdapterError::Upstream {
                status: response.status().as_u16(),
            });
        }

        let mut report: PhoneLookupReport = response.json().await?;
        report.query = query;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn sanitize_strips_and_prefixes() {
        assert_eq!(sanitize_msisdn("0300-1234567"), "923001234567");
        assert_eq!(sanitize_msisdn("+92 300 1234567"), "923001234567");
        assert_eq!(sanitize_msisdn("abc"), "");
    }

    #[tokio::test]
    async fn lookup_parses_upstream_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/lookup"))
            .and(query_param("query", "923001234567"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "results_count": 1,
                "results": [{"name": "Someone"}]
            })))
            .mount(&server)
            .await;

        let adapter = PhoneLookup::new(crate::http_client(), &server.uri());
        let report = adapter.lookup("0300 1234567").await.unwrap();

        assert!(report.success);
        assert_eq!(report.results_count, 1);
        assert_eq!(report.query, "923001234567");
    }

    #[tokio::test]
    async fn lookup_surfaces_upstream_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/lookup"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let adapter = PhoneLookup::new(crate::http_client(), &server.uri());
        let err = adapter.lookup("0300 1234567").await.unwrap_err();
        assert!(matches!(err, AdapterError::Upstream { status: 500 }));
    }

    #[tokio::test]
    async fn lookup_rejects_digitless_input() {
        let adapter = PhoneLookup::new(crate::http_client(), "http://localhost:1");
        let err = adapter.lookup("hello").await.unwrap_err();
        assert!(matches!(err, AdapterError::InvalidInput(_)));
    }
}
