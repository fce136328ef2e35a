//! Temporary email adapter (1secmail-compatible API).

use reqwest::Client;
use serde::Serialize;

use crate::AdapterError;

/// A freshly generated mailbox.
#[derive(Debug, Clone, Serialize)]
pub struct MailboxReport {
    /// The generated address.
    pub email: String,
    /// Whether the address came from the upstream (false = local fallback).
    pub upstream: bool,
}

/// Messages currently in a mailbox.
#[derive(Debug, Clone, Serialize)]
pub struct InboxReport {
    /// The inspected address.
    pub email: String,
    /// Raw message summaries from the upstream.
    pub messages: Vec<serde_json::Value>,
}

/// Adapter for the temp-mail provider.
#[derive(Debug, Clone)]
pub struct TempMail {
    client: Client,
    base_url: String,
}

impl TempMail {
    /// Create a new temp-mail adapter.
    #[must_use]
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Generate a random mailbox.
    ///
    /// Falls back to a locally generated address when the upstream is
    /// unreachable, so generation itself never fails.
    pub async fn generate(&self) -> MailboxReport {
        let url = format!("{}/api/v1/", self.base_url);
        let upstream_email = async {
            let response = self
                .client
                .get(&url)
                .query(&[("action", "genRandomMailbox"), ("count", "1")])
                .send()
                .await
                .ok()?;
            if !response.status().is_success() {
                return None;
            }
            let mailboxes: Vec<String> = response.json().await.ok()?;
            mailboxes.into_iter().next()
        }
        .await;

        match upstream_email {
            Some(email) => MailboxReport {
                email,
                upstream: true,
            },
            None => {
                tracing::warn!("temp-mail upstream unavailable, using local mailbox name");
                MailboxReport {
                    email: local_mailbox(),
                    upstream: false,
                }
            }
        }
    }

    /// Fetch the messages waiting in a mailbox. Checking is free of charge,
    /// so this bypasses the gate entirely.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the address has no `@`. Upstream failures
    /// yield an empty inbox rather than an error.
    pub async fn check_inbox(&self, email: &str) -> Result<InboxReport, AdapterError> {
        let (login, domain) = email
            .split_once('@')
            .ok_or_else(|| AdapterError::InvalidInput("malformed email address".into()))?;

        let url = format!("{}/api/v1/", self.base_url);
        let messages = async {
            let response = self
                .client
                .get(&url)
                .query(&[("action", "getMessages"), ("login", login), ("domain", domain)])
                .send()
                .await
                .ok()?;
            if !response.status().is_success() {
                return None;
            }
            response.json::<Vec<serde_json::Value>>().await.ok()
        }
        .await
        .unwrap_or_default();

        Ok(InboxReport {
            email: email.to_string(),
            messages,
        })
    }
}

/// Generate a local mailbox name from UUID randomness.
fn local_mailbox() -> String {
    let tag = uuid::Uuid::new_v4().simple().to_string();
    format!("{}@1secmail.com", &tag[..10])
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn generate_uses_upstream_mailbox() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/"))
            .and(query_param("action", "genRandomMailbox"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!(["abc@1secmail.com"])),
            )
            .mount(&server)
            .await;

        let adapter = TempMail::new(crate::http_client(), &server.uri());
        let report = adapter.generate().await;

        assert_eq!(report.email, "abc@1secmail.com");
        assert!(report.upstream);
    }

    #[tokio::test]
    async fn generate_falls_back_locally() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let adapter = TempMail::new(crate::http_client(), &server.uri());
        let report = adapter.generate().await;

        assert!(!report.upstream);
        assert!(report.email.ends_with("@1secmail.com"));
        assert_eq!(report.email.split('@').next().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn check_inbox_lists_messages() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/"))
            .and(query_param("action", "getMessages"))
            .and(query_param("login", "abc"))
            .and(query_param("domain", "1secmail.com"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([{"id": 1, "subject": "hi"}])),
            )
            .mount(&server)
            .await;

        let adapter = TempMail::new(crate::http_client(), &server.uri());
        let report = adapter.check_inbox("abc@1secmail.com").await.unwrap();

        assert_eq!(report.messages.len(), 1);
    }

    #[tokio::test]
    async fn check_inbox_rejects_malformed_address() {
        let adapter = TempMail::new(crate::http_client(), "http://localhost:1");
        let err = adapter.check_inbox("not-an-email").await.unwrap_err();
        assert!(matches!(err, AdapterError::InvalidInput(_)));
    }
}
