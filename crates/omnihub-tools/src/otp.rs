//! Tamasha OTP adapter.
//!
//! Sending costs credits; verification is free. The Tamasha API is not
//! wired yet, so both actions answer with simulated confirmations through
//! the same normalized shape a real integration will use.

use serde::Serialize;

use crate::phone::sanitize_msisdn;
use crate::AdapterError;

/// Normalized OTP action result.
#[derive(Debug, Clone, Serialize)]
pub struct OtpReport {
    /// Whether the action was accepted.
    pub success: bool,
    /// Human-readable status.
    pub message: String,
}

/// Adapter for the Tamasha OTP service.
#[derive(Debug, Clone, Default)]
pub struct TamashaOtp;

impl TamashaOtp {
    /// Create a new OTP adapter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Send an OTP to a phone number.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the number has no digits.
    pub fn send(&self, phone: &str) -> Result<OtpReport, AdapterError> {
        let msisdn = sanitize_msisdn(phone);
        if msisdn.is_empty() {
            return Err(AdapterError::InvalidInput(
                "phone number contains no digits".into(),
            ));
        }

        Ok(OtpReport {
            success: true,
            message: "OTP sent successfully (simulated). Configure Tamasha API for full functionality."
                .to_string(),
        })
    }

    /// Verify an OTP code. Free of charge.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the code is empty.
    pub fn verify(&self, phone: &str, otp: &str) -> Result<OtpReport, AdapterError> {
        if sanitize_msisdn(phone).is_empty() || otp.trim().is_empty() {
            return Err(AdapterError::InvalidInput(
                "phone and otp are required".into(),
            ));
        }

        Ok(OtpReport {
            success: true,
            message: "OTP verified (simulated). Configure Tamasha API for full functionality."
                .to_string(),
        })
    }
}
