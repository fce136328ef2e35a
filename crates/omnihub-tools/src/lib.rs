//! External tool adapters for OmniHub.
//!
//! Each adapter is a stateless struct that translates a validated request
//! into one external API call and a normalized response. Adapters own their
//! `reqwest::Client` (30 second timeout) and a configurable base URL so tests
//! can point them at a local mock server.
//!
//! Adapters never touch accounts, credits, or logs; the authorization gate in
//! the service crate is responsible for all accounting around an adapter call.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod enhance;
pub mod eyecon;
pub mod livetv;
pub mod otp;
pub mod phone;
pub mod tempmail;
pub mod video;

pub use enhance::{EnhanceReport, ImageEnhance};
pub use eyecon::{EyeconAuth, EyeconLookup, EyeconReport};
pub use livetv::{Channel, LiveTv, StreamReport};
pub use otp::{OtpReport, TamashaOtp};
pub use phone::{sanitize_msisdn, PhoneLookup, PhoneLookupReport};
pub use tempmail::{InboxReport, MailboxReport, TempMail};
pub use video::{DownloadLink, VideoReport, YoutubeInfo};

use std::time::Duration;

/// Default timeout applied to every adapter HTTP client.
pub const ADAPTER_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the shared adapter HTTP client.
///
/// # Panics
///
/// Panics if the client cannot be built (should not happen with default
/// settings).
#[must_use]
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(ADAPTER_HTTP_TIMEOUT)
        .build()
        .expect("failed to build HTTP client")
}

/// Errors an adapter can produce.
///
/// `InvalidInput`, `NotFound`, and `Unavailable` are request-shaped failures;
/// the rest are transport or upstream failures. All of them are recorded by
/// the gate as failed usage with zero charge.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// The request input could not be used (bad URL, malformed address, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The requested resource does not exist (e.g. unknown channel).
    #[error("not found: {0}")]
    NotFound(String),

    /// The resource exists but is not currently usable.
    #[error("unavailable: {0}")]
    Unavailable(String),

    /// The upstream answered with an unexpected status.
    #[error("upstream error: status {status}")]
    Upstream {
        /// HTTP status code returned by the upstream.
        status: u16,
    },

    /// The upstream did not answer in time.
    #[error("upstream timed out")]
    Timeout,

    /// Transport-level HTTP failure.
    #[error("http error: {0}")]
    Http(String),
}

impl From<reqwest::Error> for AdapterError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err.to_string())
        }
    }
}

/// Configuration for constructing the full adapter set.
#[derive(Debug, Clone)]
pub struct ToolsConfig {
    /// Base URL of the phone database API.
    pub phone_base_url: String,
    /// Base URL of the Eyecon API.
    pub eyecon_base_url: String,
    /// Eyecon auth header values, if configured.
    pub eyecon_auth: Option<EyeconAuth>,
    /// Base URL of the temp-mail provider.
    pub tempmail_base_url: String,
    /// Base URL of the video oEmbed endpoint.
    pub oembed_base_url: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            phone_base_url: "https://sychosimdatabase.vercel.app".into(),
            eyecon_base_url: "https://api.eyecon-app.com".into(),
            eyecon_auth: None,
            tempmail_base_url: "https://www.1secmail.com".into(),
            oembed_base_url: "https://noembed.com".into(),
        }
    }
}

/// The full set of adapters, one per tool.
pub struct ToolSet {
    /// Phone database lookup.
    pub phone: PhoneLookup,
    /// Eyecon caller-id lookup.
    pub eyecon: EyeconLookup,
    /// Temporary email mailboxes.
    pub tempmail: TempMail,
    /// YouTube metadata and download links.
    pub youtube: YoutubeInfo,
    /// Image enhancement.
    pub enhance: ImageEnhance,
    /// Live TV channel catalog and streams.
    pub livetv: LiveTv,
    /// Tamasha OTP.
    pub otp: TamashaOtp,
}

impl ToolSet {
    /// Build every adapter from one configuration.
    #[must_use]
    pub fn new(config: &ToolsConfig) -> Self {
        let client = http_client();
        Self {
            phone: PhoneLookup::new(client.clone(), &config.phone_base_url),
            eyecon: EyeconLookup::new(
                client.clone(),
                &config.eyecon_base_url,
                config.eyecon_auth.clone(),
            ),
            tempmail: TempMail::new(client.clone(), &config.tempmail_base_url),
            youtube: YoutubeInfo::new(client, &config.oembed_base_url),
            enhance: ImageEnhance::new(),
            livetv: LiveTv::new(),
            otp: TamashaOtp::new(),
        }
    }
}
