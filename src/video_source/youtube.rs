//! YouTube URL parsing and oEmbed metadata.

use super::{TitleSource, VideoId};
use crate::error::{GleanError, Result};
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, instrument};

const OEMBED_URL: &str = "https://www.youtube.com/oembed";

// Scheme, www./m. and the path prefix are optional; the token is case-sensitive.
static VIDEO_ID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:https?://)?(?:www\.)?(?:m\.)?(?:youtube\.com|youtu\.be)/(?:watch\?v=|embed/|v/|)([A-Za-z0-9_-]{11})(?:\S+)?",
    )
    .expect("Invalid regex")
});

/// Extract the video id from a free-form YouTube URL.
///
/// Returns `None` when no recognizable URL shape is present. A match says
/// nothing about whether the video exists.
pub fn extract_video_id(input: &str) -> Option<VideoId> {
    let caps = VIDEO_ID_REGEX.captures(input)?;
    caps.get(1).and_then(|m| VideoId::parse(m.as_str()))
}

/// Title lookup through YouTube's oEmbed endpoint.
pub struct OEmbedTitleSource {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct OEmbedResponse {
    title: String,
}

impl OEmbedTitleSource {
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::with_endpoint(OEMBED_URL, timeout)
    }

    /// Create a source pointed at a custom oEmbed endpoint.
    pub fn with_endpoint(endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }
}

#[async_trait]
impl TitleSource for OEmbedTitleSource {
    #[instrument(skip(self))]
    async fn fetch_title(&self, video_url: &str) -> Result<String> {
        let url = url::Url::parse_with_params(
            &self.endpoint,
            &[("url", video_url), ("format", "json")],
        )
        .map_err(|e| GleanError::Metadata(format!("Invalid oEmbed endpoint: {}", e)))?;

        debug!("Fetching title from {}", url);

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(GleanError::Metadata(format!(
                "oEmbed returned {}",
                response.status()
            )));
        }

        let body: OEmbedResponse = response.json().await?;
        Ok(body.title)
    }
}
