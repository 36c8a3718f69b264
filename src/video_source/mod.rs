//! Video source abstraction for Glean.
//!
//! Video id extraction and best-effort metadata lookup for YouTube URLs.

mod youtube;

pub use youtube::{extract_video_id, OEmbedTitleSource};

use crate::error::Result;
use async_trait::async_trait;
use serde::{Serialize, Serializer};
use std::future::Future;
use tracing::warn;

/// Title used whenever the metadata lookup fails.
pub const PLACEHOLDER_TITLE: &str = "Untitled Video";

/// Length of a canonical YouTube video id.
pub const VIDEO_ID_LEN: usize = 11;

/// Canonical 11-character YouTube video identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    /// Validate a bare token as a video id.
    pub fn parse(token: &str) -> Option<Self> {
        let valid = token.len() == VIDEO_ID_LEN
            && token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        valid.then(|| Self(token.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical watch URL for this video.
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for VideoId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Trait for video title providers.
#[async_trait]
pub trait TitleSource: Send + Sync {
    /// Look up the display title for the video at `video_url`.
    async fn fetch_title(&self, video_url: &str) -> Result<String>;
}

/// Await a fallible lookup and substitute `placeholder` on failure or a blank result.
///
/// The failure is logged and never returned.
pub async fn or_placeholder<F, E>(lookup: F, placeholder: &str) -> String
where
    F: Future<Output = std::result::Result<String, E>>,
    E: std::fmt::Display,
{
    match lookup.await {
        Ok(value) if !value.trim().is_empty() => value.trim().to_string(),
        Ok(_) => {
            warn!("Lookup returned a blank value, using placeholder");
            placeholder.to_string()
        }
        Err(e) => {
            warn!("Lookup failed, using placeholder: {}", e);
            placeholder.to_string()
        }
    }
}
