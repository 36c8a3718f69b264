//! YouTube caption retrieval through the InnerTube player API.
//!
//! Flow: watch page (for the InnerTube key) -> player endpoint (caption track
//! list) -> timed-text XML for the chosen track.

use super::captions::parse_caption_xml;
use super::{TranscriptError, TranscriptSegment, TranscriptSource};
use crate::error::Result;
use crate::video_source::VideoId;
use async_trait::async_trait;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use reqwest::StatusCode;
use serde_json::Value;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, info, instrument};

const YOUTUBE_BASE_URL: &str = "https://www.youtube.com";

static API_KEY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""INNERTUBE_API_KEY":\s*"([a-zA-Z0-9_-]+)""#).expect("Invalid regex")
});

/// A caption track advertised by the player response.
#[derive(Debug, Clone, PartialEq)]
struct CaptionTrack {
    language_code: String,
    base_url: String,
    is_generated: bool,
}

/// Transcript source backed by YouTube's public caption tracks.
pub struct YoutubeTranscriptSource {
    client: reqwest::Client,
    base_url: String,
    languages: Vec<String>,
}

impl YoutubeTranscriptSource {
    pub fn new(languages: Vec<String>, timeout: Duration) -> Result<Self> {
        Self::with_base_url(YOUTUBE_BASE_URL, languages, timeout)
    }

    /// Create a source pointed at a custom YouTube host.
    pub fn with_base_url(base_url: &str, languages: Vec<String>, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        let languages = if languages.is_empty() {
            vec!["en".to_string()]
        } else {
            languages
        };

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            languages,
        })
    }

    async fn fetch_watch_page(&self, video_id: &VideoId) -> std::result::Result<String, TranscriptError> {
        let url = format!("{}/watch?v={}", self.base_url, video_id);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| TranscriptError::Transport(format!("Failed to fetch video page: {}", e)))?;

        check_status(response.status())?;

        response
            .text()
            .await
            .map_err(|e| TranscriptError::Transport(format!("Failed to read video page: {}", e)))
    }

    async fn fetch_player(
        &self,
        video_id: &VideoId,
        api_key: &str,
    ) -> std::result::Result<Value, TranscriptError> {
        let url = format!("{}/youtubei/v1/player?key={}", self.base_url, api_key);
        let body = serde_json::json!({
            "context": {
                "client": {
                    "clientName": "ANDROID",
                    "clientVersion": "20.10.38"
                }
            },
            "videoId": video_id.as_str()
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| TranscriptError::Transport(format!("Failed to fetch player data: {}", e)))?;

        check_status(response.status())?;

        response
            .json()
            .await
            .map_err(|e| TranscriptError::Transport(format!("Failed to parse player data: {}", e)))
    }

    async fn fetch_track(
        &self,
        track: &CaptionTrack,
    ) -> std::result::Result<Vec<TranscriptSegment>, TranscriptError> {
        if track.base_url.contains("&exp=xpe") {
            return Err(TranscriptError::Transport(
                "YouTube requires a PO token for this caption track".to_string(),
            ));
        }

        let response = self
            .client
            .get(&track.base_url)
            .send()
            .await
            .map_err(|e| TranscriptError::Transport(format!("Failed to fetch captions: {}", e)))?;

        check_status(response.status())?;

        let xml = response
            .text()
            .await
            .map_err(|e| TranscriptError::Transport(format!("Failed to read captions: {}", e)))?;

        parse_caption_xml(&xml)
    }
}

#[async_trait]
impl TranscriptSource for YoutubeTranscriptSource {
    #[instrument(skip(self), fields(video_id = %video_id))]
    async fn fetch_transcript(
        &self,
        video_id: &VideoId,
    ) -> std::result::Result<Vec<TranscriptSegment>, TranscriptError> {
        let html = self.fetch_watch_page(video_id).await?;
        let api_key = extract_api_key(&html)?;
        let player = self.fetch_player(video_id, &api_key).await?;

        check_playability(video_id, &player)?;

        let tracks = caption_tracks(video_id, &player)?;
        let track = select_track(&tracks, &self.languages)
            .ok_or_else(|| TranscriptError::NotFound(video_id.to_string()))?;

        debug!(
            "Using {} caption track ({})",
            track.language_code,
            if track.is_generated { "generated" } else { "manual" }
        );

        let segments = self.fetch_track(track).await?;
        info!("Fetched {} caption segments", segments.len());
        Ok(segments)
    }
}

fn check_status(status: StatusCode) -> std::result::Result<(), TranscriptError> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(TranscriptError::Transport(
            "YouTube is rate limiting requests from this IP".to_string(),
        ));
    }
    if !status.is_success() {
        return Err(TranscriptError::Transport(format!(
            "YouTube returned HTTP {}",
            status
        )));
    }
    Ok(())
}

fn extract_api_key(html: &str) -> std::result::Result<String, TranscriptError> {
    if html.contains("class=\"g-recaptcha\"") {
        return Err(TranscriptError::Transport(
            "YouTube is blocking requests from this IP".to_string(),
        ));
    }
    if html.contains("action=\"https://consent.youtube.com/s\"") {
        return Err(TranscriptError::Transport(
            "YouTube requires cookie consent for this request".to_string(),
        ));
    }

    API_KEY_REGEX
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| TranscriptError::Transport("Could not parse YouTube video page".to_string()))
}

fn check_playability(video_id: &VideoId, player: &Value) -> std::result::Result<(), TranscriptError> {
    let Some(playability) = player.get("playabilityStatus") else {
        return Ok(());
    };

    let status = playability.get("status").and_then(Value::as_str).unwrap_or("OK");
    if status == "OK" {
        return Ok(());
    }

    let reason = playability
        .get("reason")
        .and_then(Value::as_str)
        .unwrap_or("unknown reason");

    match status {
        "LOGIN_REQUIRED" if reason.contains("not a bot") => Err(TranscriptError::Transport(
            "YouTube is blocking requests from this IP".to_string(),
        )),
        "LOGIN_REQUIRED" if reason.contains("inappropriate") || reason.contains("age") => Err(
            TranscriptError::Transport(format!("Video {} is age restricted", video_id)),
        ),
        // Private, removed and unplayable videos have no reachable transcript.
        _ => Err(TranscriptError::NotFound(video_id.to_string())),
    }
}

fn caption_tracks(
    video_id: &VideoId,
    player: &Value,
) -> std::result::Result<Vec<CaptionTrack>, TranscriptError> {
    let renderer = player
        .get("captions")
        .and_then(|c| c.get("playerCaptionsTracklistRenderer"))
        .ok_or_else(|| TranscriptError::Disabled(video_id.to_string()))?;

    let tracks: Vec<CaptionTrack> = renderer
        .get("captionTracks")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(|track| {
                    Some(CaptionTrack {
                        language_code: track.get("languageCode")?.as_str()?.to_string(),
                        base_url: track.get("baseUrl")?.as_str()?.replace("&fmt=srv3", ""),
                        is_generated: track.get("kind").and_then(Value::as_str) == Some("asr"),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    if tracks.is_empty() {
        return Err(TranscriptError::Disabled(video_id.to_string()));
    }

    Ok(tracks)
}

/// Pick the first language with a track, preferring manual captions over generated ones.
fn select_track<'a>(tracks: &'a [CaptionTrack], languages: &[String]) -> Option<&'a CaptionTrack> {
    languages.iter().find_map(|lang| {
        tracks
            .iter()
            .find(|t| &t.language_code == lang && !t.is_generated)
            .or_else(|| tracks.iter().find(|t| &t.language_code == lang))
    })
}
