//! Image enhancement adapter.
//!
//! The enhancement provider is not wired yet; the adapter validates input
//! and answers with a pass-through payload so the rest of the pipeline
//! (gate, accounting, UI) exercises the same path it will with a real
//! provider behind it.

use serde::Serialize;

use crate::AdapterError;

/// Normalized enhancement result.
#[derive(Debug, Clone, Serialize)]
pub struct EnhanceReport {
    /// URL of the source image.
    pub original_url: String,
    /// URL of the enhanced image.
    pub enhanced_url: String,
    /// Provider status note.
    pub message: String,
}

/// Adapter for the image enhancement service.
#[derive(Debug, Clone, Default)]
pub struct ImageEnhance;

impl ImageEnhance {
    /// Create a new image enhancement adapter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Enhance the image at `image_url`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the URL is empty or not http(s).
    pub fn enhance(&self, image_url: &str) -> Result<EnhanceReport, AdapterError> {
        if !image_url.starts_with("http://") && !image_url.starts_with("https://") {
            return Err(AdapterError::InvalidInput(
                "image_url must be an http(s) URL".into(),
            ));
        }

        Ok(EnhanceReport {
            original_url: image_url.to_string(),
            enhanced_url: image_url.to_string(),
            message: "Image enhancement service ready. Configure external API for full functionality."
                .to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enhance_passes_url_through() {
        let adapter = ImageEnhance::new();
        let report = adapter.enhance("https://example.com/cat.jpg").unwrap();
        assert_eq!(report.original_url, report.enhanced_url);
    }

    #[test]
    fn enhance_rejects_non_http_input() {
        let adapter = ImageEnhance::new();
        assert!(matches!(
            adapter.enhance("file:///etc/passwd"),
            Err(AdapterError::InvalidInput(_))
        ));
        assert!(matches!(
            adapter.enhance(""),
            Err(AdapterError::InvalidInput(_))
        ));
    }
}
