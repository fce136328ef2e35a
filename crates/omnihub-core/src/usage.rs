//! Usage record types and the tool enumeration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{RecordId, UserId};

/// The fixed set of externally-backed tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    /// Live TV stream resolution.
    LiveTv,

    /// Tamasha OTP send.
    TamashaOtp,

    /// Temporary email mailbox generation.
    TempEmail,

    /// YouTube video metadata and download links.
    YoutubeDownload,

    /// Image enhancement.
    ImageEnhance,

    /// Phone number database lookup.
    PhoneLookup,

    /// Eyecon caller-id name lookup.
    EyeconLookup,
}

impl ToolKind {
    /// All tools, in a stable order.
    pub const ALL: [Self; 7] = [
        Self::LiveTv,
        Self::TamashaOtp,
        Self::TempEmail,
        Self::YoutubeDownload,
        Self::ImageEnhance,
        Self::PhoneLookup,
        Self::EyeconLookup,
    ];

    /// Get the tool identifier as a string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LiveTv => "live_tv",
            Self::TamashaOtp => "tamasha_otp",
            Self::TempEmail => "temp_email",
            Self::YoutubeDownload => "youtube_download",
            Self::ImageEnhance => "image_enhance",
            Self::PhoneLookup => "phone_lookup",
            Self::EyeconLookup => "eyecon_lookup",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolKind {
    type Err = UnknownTool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolKind::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownTool(s.to_string()))
    }
}

/// Error returned when parsing an unrecognized tool identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tool: {0}")]
pub struct UnknownTool(pub String);

/// Outcome of a tool invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageStatus {
    /// The adapter returned a result and credits were charged.
    Success,

    /// The adapter failed; nothing was charged.
    Failure,
}

/// An immutable record of one tool invocation attempt.
///
/// Written for every attempt that reaches the external adapter, successful or
/// not. Rejections before the adapter call (suspended account, insufficient
/// credits) produce no record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageRecord {
    /// Unique record ID (ULID for time-ordering).
    pub id: RecordId,

    /// The account that invoked the tool.
    pub user_id: UserId,

    /// Which tool was invoked.
    pub tool: ToolKind,

    /// Credits charged. Zero when the call failed.
    pub credits_charged: i64,

    /// Whether the invocation succeeded.
    pub status: UsageStatus,

    /// Free-text detail: a request summary on success, an error on failure.
    pub detail: String,

    /// When the record was written.
    pub created_at: DateTime<Utc>,
}

impl UsageRecord {
    /// Create a record for a successful, charged invocation.
    #[must_use]
    pub fn success(user_id: UserId, tool: ToolKind, credits_charged: i64, detail: String) -> Self {
        Self {
            id: RecordId::generate(),
            user_id,
            tool,
            credits_charged,
            status: UsageStatus::Success,
            detail,
            created_at: Utc::now(),
        }
    }

    /// Create a record for a failed invocation. Charges nothing.
    #[must_use]
    pub fn failure(user_id: UserId, tool: ToolKind, detail: String) -> Self {
        Self {
            id: RecordId::generate(),
            user_id,
            tool,
            credits_charged: 0,
            status: UsageStatus::Failure,
            detail,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_kind_roundtrip() {
        for tool in ToolKind::ALL {
            assert_eq!(tool.as_str().parse::<ToolKind>().unwrap(), tool);
        }
    }

    #[test]
    fn unknown_tool_is_rejected() {
        let err = "time_machine".parse::<ToolKind>().unwrap_err();
        assert_eq!(err, UnknownTool("time_machine".into()));
    }

    #[test]
    fn failure_record_charges_nothing() {
        let record = UsageRecord::failure(
            UserId::generate(),
            ToolKind::PhoneLookup,
            "upstream timed out".into(),
        );
        assert_eq!(record.credits_charged, 0);
        assert_eq!(record.status, UsageStatus::Failure);
    }

    #[test]
    fn success_record_carries_charge() {
        let record =
            UsageRecord::success(UserId::generate(), ToolKind::ImageEnhance, 2, "img".into());
        assert_eq!(record.credits_charged, 2);
        assert_eq!(record.status, UsageStatus::Success);
    }
}
