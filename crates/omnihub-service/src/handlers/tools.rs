//! Tool handlers. Every charged call goes through the gate.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use omnihub_core::ToolKind;
use omnihub_tools::{sanitize_msisdn, Channel, InboxReport, OtpReport};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::gate::{run_charged, ToolReceipt};
use crate::state::AppState;

/// A charged tool call response: the adapter's payload plus accounting.
#[derive(Debug, Serialize)]
pub struct ToolCallResponse<T: Serialize> {
    /// The adapter's normalized result.
    #[serde(flatten)]
    pub result: T,
    /// Credits deducted for this call.
    pub credits_used: i64,
    /// Balance after the deduction.
    pub balance: i64,
}

impl<T: Serialize> From<ToolReceipt<T>> for ToolCallResponse<T> {
    fn from(receipt: ToolReceipt<T>) -> Self {
        Self {
            result: receipt.outcome,
            credits_used: receipt.credits_used,
            balance: receipt.balance,
        }
    }
}

// ============================================================================
// Phone lookups
// ============================================================================

/// Phone lookup request.
#[derive(Debug, Deserialize)]
pub struct PhoneLookupRequest {
    /// Phone number in any human format.
    pub phone: String,
}

/// Look up a phone number in the database backend.
pub async fn phone_lookup(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<PhoneLookupRequest>,
) -> Result<Json<ToolCallResponse<omnihub_tools::PhoneLookupReport>>, ApiError> {
    let detail = sanitize_msisdn(&body.phone);
    let receipt = run_charged(
        &state,
        auth.user_id,
        ToolKind::PhoneLookup,
        detail,
        state.tools.phone.lookup(&body.phone),
    )
    .await?;

    Ok(Json(receipt.into()))
}

/// Look up the names registered for a number via Eyecon.
pub async fn eyecon_lookup(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<PhoneLookupRequest>,
) -> Result<Json<ToolCallResponse<omnihub_tools::EyeconReport>>, ApiError> {
    let detail = sanitize_msisdn(&body.phone);
    let receipt = run_charged(
        &state,
        auth.user_id,
        ToolKind::EyeconLookup,
        detail,
        state.tools.eyecon.lookup(&body.phone),
    )
    .await?;

    Ok(Json(receipt.into()))
}

// ============================================================================
// Temp email
// ============================================================================

/// Temp email request. Generating costs credits; checking an inbox is free.
#[derive(Debug, Deserialize)]
pub struct TempEmailRequest {
    /// "generate" (default) or "check".
    #[serde(default = "default_tempmail_action")]
    pub action: String,
    /// The mailbox to check (required for "check").
    pub email: Option<String>,
}

fn default_tempmail_action() -> String {
    "generate".into()
}

/// Free inbox-check response.
#[derive(Debug, Serialize)]
pub struct InboxResponse {
    /// The inbox contents.
    #[serde(flatten)]
    pub inbox: InboxReport,
    /// Checking is free.
    pub credits_used: i64,
}

/// Temp email response: either a charged generation or a free inbox check.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum TempEmailResponse {
    /// A freshly generated mailbox.
    Generated(ToolCallResponse<omnihub_tools::MailboxReport>),
    /// The inbox contents.
    Checked(InboxResponse),
}

/// Generate a temp mailbox or check an existing one.
pub async fn temp_email(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<TempEmailRequest>,
) -> Result<Json<TempEmailResponse>, ApiError> {
    match body.action.as_str() {
        "generate" => {
            let receipt = run_charged(
                &state,
                auth.user_id,
                ToolKind::TempEmail,
                "generated",
                async { Ok(state.tools.tempmail.generate().await) },
            )
            .await?;
            Ok(Json(TempEmailResponse::Generated(receipt.into())))
        }
        "check" => {
            let email = body
                .email
                .ok_or_else(|| ApiError::BadRequest("email is required for check".into()))?;
            let inbox = state.tools.tempmail.check_inbox(&email).await?;
            Ok(Json(TempEmailResponse::Checked(InboxResponse {
                inbox,
                credits_used: 0,
            })))
        }
        other => Err(ApiError::BadRequest(format!("Invalid action: {other}"))),
    }
}

// ============================================================================
// Video download
// ============================================================================

/// Video download request.
#[derive(Debug, Deserialize)]
pub struct YoutubeRequest {
    /// A youtube.com or youtu.be watch URL.
    pub url: String,
}

/// Fetch metadata and download links for a video.
pub async fn youtube_download(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<YoutubeRequest>,
) -> Result<Json<ToolCallResponse<omnihub_tools::VideoReport>>, ApiError> {
    let detail = omnihub_tools::video::extract_video_id(&body.url).unwrap_or_default();
    let receipt = run_charged(
        &state,
        auth.user_id,
        ToolKind::YoutubeDownload,
        detail,
        state.tools.youtube.fetch(&body.url),
    )
    .await?;

    Ok(Json(receipt.into()))
}

// ============================================================================
// Image enhancement
// ============================================================================

/// Image enhancement request.
#[derive(Debug, Deserialize)]
pub struct ImageEnhanceRequest {
    /// URL of the image to enhance.
    pub image_url: String,
}

/// Enhance an image.
pub async fn image_enhance(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<ImageEnhanceRequest>,
) -> Result<Json<ToolCallResponse<omnihub_tools::EnhanceReport>>, ApiError> {
    let receipt = run_charged(
        &state,
        auth.user_id,
        ToolKind::ImageEnhance,
        body.image_url.clone(),
        async { state.tools.enhance.enhance(&body.image_url) },
    )
    .await?;

    Ok(Json(receipt.into()))
}

// ============================================================================
// Live TV
// ============================================================================

/// Channel catalog response.
#[derive(Debug, Serialize)]
pub struct ChannelsResponse {
    /// The channels.
    pub channels: Vec<Channel>,
    /// Number of channels returned.
    pub total: usize,
    /// Category filter, if one was applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// List all channels. Browsing the catalog is free.
pub async fn tv_channels(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
) -> Result<Json<ChannelsResponse>, ApiError> {
    let channels: Vec<Channel> = state.tools.livetv.channels().to_vec();
    Ok(Json(ChannelsResponse {
        total: channels.len(),
        channels,
        category: None,
    }))
}

/// List channels in one category. Free.
pub async fn tv_channels_by_category(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(category): Path<String>,
) -> Result<Json<ChannelsResponse>, ApiError> {
    let channels: Vec<Channel> = state
        .tools
        .livetv
        .channels_by_category(&category)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(ChannelsResponse {
        total: channels.len(),
        channels,
        category: Some(category),
    }))
}

/// Resolve a playable stream for a channel. This is the charged operation.
pub async fn tv_stream(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(channel_id): Path<String>,
) -> Result<Json<ToolCallResponse<omnihub_tools::StreamReport>>, ApiError> {
    let receipt = run_charged(
        &state,
        auth.user_id,
        ToolKind::LiveTv,
        channel_id.clone(),
        async { state.tools.livetv.resolve_stream(&channel_id) },
    )
    .await?;

    Ok(Json(receipt.into()))
}

// ============================================================================
// Tamasha OTP
// ============================================================================

/// OTP request. Sending costs credits; verification is free.
#[derive(Debug, Deserialize)]
pub struct TamashaOtpRequest {
    /// Destination phone number.
    pub phone: String,
    /// "send" (default) or "verify".
    #[serde(default = "default_otp_action")]
    pub action: String,
    /// The code to verify (required for "verify").
    pub otp: Option<String>,
}

fn default_otp_action() -> String {
    "send".into()
}

/// Free OTP verification response.
#[derive(Debug, Serialize)]
pub struct OtpVerifyResponse {
    /// The verification result.
    #[serde(flatten)]
    pub report: OtpReport,
    /// Verification is free.
    pub credits_used: i64,
}

/// OTP response: either a charged send or a free verification.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum TamashaOtpResponse {
    /// OTP was sent (charged).
    Sent(ToolCallResponse<OtpReport>),
    /// OTP was verified (free).
    Verified(OtpVerifyResponse),
}

/// Send or verify a Tamasha OTP.
pub async fn tamasha_otp(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<TamashaOtpRequest>,
) -> Result<Json<TamashaOtpResponse>, ApiError> {
    match body.action.as_str() {
        "send" => {
            let detail = format!("send:{}", sanitize_msisdn(&body.phone));
            let receipt = run_charged(&state, auth.user_id, ToolKind::TamashaOtp, detail, async {
                state.tools.otp.send(&body.phone)
            })
            .await?;
            Ok(Json(TamashaOtpResponse::Sent(receipt.into())))
        }
        "verify" => {
            let otp = body
                .otp
                .ok_or_else(|| ApiError::BadRequest("otp is required for verify".into()))?;
            let report = state.tools.otp.verify(&body.phone, &otp)?;
            Ok(Json(TamashaOtpResponse::Verified(OtpVerifyResponse {
                report,
                credits_used: 0,
            })))
        }
        other => Err(ApiError::BadRequest(format!("Invalid action: {other}"))),
    }
}
