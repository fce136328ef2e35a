//! YouTube metadata adapter.
//!
//! Extracts the video id from a watch URL, fetches oEmbed metadata, and
//! assembles download links.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::AdapterError;

/// One downloadable rendition.
#[derive(Debug, Clone, Serialize)]
pub struct DownloadLink {
    /// Rendition label (e.g. "720p").
    pub quality: &'static str,
    /// Download URL.
    pub url: String,
}

/// Normalized video metadata.
#[derive(Debug, Clone, Serialize)]
pub struct VideoReport {
    /// The extracted video id.
    pub video_id: String,
    /// Video title.
    pub title: String,
    /// Channel/author name.
    pub author: String,
    /// Thumbnail URL.
    pub thumbnail: String,
    /// Download links, highest quality first.
    pub download_links: Vec<DownloadLink>,
}

#[derive(Debug, Deserialize)]
struct OembedPayload {
    title: Option<String>,
    author_name: Option<String>,
    thumbnail_url: Option<String>,
}

/// Extract the video id from a `youtube.com` or `youtu.be` URL.
#[must_use]
pub fn extract_video_id(url: &str) -> Option<String> {
    if url.contains("youtube.com") {
        let (_, rest) = url.split_once("v=")?;
        let id = rest.split('&').next()?;
        (!id.is_empty()).then(|| id.to_string())
    } else if url.contains("youtu.be") {
        let id = url.rsplit('/').next()?.split('?').next()?;
        (!id.is_empty()).then(|| id.to_string())
    } else {
        None
    }
}

/// Adapter for the oEmbed metadata endpoint.
#[derive(Debug, Clone)]
pub struct YoutubeInfo {
    client: Client,
    base_url: String,
}

impl YoutubeInfo {
    /// Create a new video metadata adapter.
    #[must_use]
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch metadata and download links for a watch URL.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for URLs no video id can be extracted from, and
    /// upstream/transport errors otherwise.
    pub async fn fetch(&self, url: &str) -> Result<VideoReport, AdapterError> {
        let video_id = extract_video_id(url)
            .ok_or_else(|| AdapterError::InvalidInput("invalid YouTube URL".into()))?;

        let oembed_url = format!("{}/embed", self.base_url);
        let watch_url = format!("https://www.youtube.com/watch?v={video_id}");
        let response = self
            .client
            .get(&oembed_url)
            .query(&[("url", watch_url.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AdapterError::Upstream {
                status: response.status().as_u16(),
            });
        }

        let payload: OembedPayload = response.json().await?;
        let download_url = format!("https://ssyoutube.com/watch?v={video_id}");

        Ok(VideoReport {
            title: payload.title.unwrap_or_else(|| "Unknown".into()),
            author: payload.author_name.unwrap_or_else(|| "Unknown".into()),
            thumbnail: payload.thumbnail_url.unwrap_or_else(|| {
                format!("https://img.youtube.com/vi/{video_id}/maxresdefault.jpg")
            }),
            download_links: vec![
                DownloadLink {
                    quality: "720p",
                    url: download_url.clone(),
                },
                DownloadLink {
                    quality: "360p",
                    url: download_url,
                },
            ],
            video_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn extracts_watch_urls() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=1s").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ?si=xyz").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(extract_video_id("https://example.com/watch?v=abc"), None);
        assert_eq!(extract_video_id("https://www.youtube.com/"), None);
    }

    #[tokio::test]
    async fn fetch_builds_report() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/embed"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "title": "A Video",
                "author_name": "A Channel",
                "thumbnail_url": "https://img.example/thumb.jpg"
            })))
            .mount(&server)
            .await;

        let adapter = YoutubeInfo::new(crate::http_client(), &server.uri());
        let report = adapter
            .fetch("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
            .await
            .unwrap();

        assert_eq!(report.video_id, "dQw4w9WgXcQ");
        assert_eq!(report.title, "A Video");
        assert_eq!(report.download_links.len(), 2);
        assert_eq!(report.download_links[0].quality, "720p");
    }

    #[tokio::test]
    async fn fetch_rejects_non_youtube_urls() {
        let adapter = YoutubeInfo::new(crate::http_client(), "http://localhost:1");
        let err = adapter.fetch("https://vimeo.com/12345").await.unwrap_err();
        assert!(matches!(err, AdapterError::InvalidInput(_)));
    }
}
