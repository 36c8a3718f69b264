//! Caption transcript retrieval.
//!
//! The transcript collaborator reports one of three failure kinds, which the
//! orchestrator matches exhaustively to pick a response status.

mod captions;
mod youtube;

pub use captions::parse_caption_xml;
pub use youtube::YoutubeTranscriptSource;

use crate::video_source::VideoId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single caption segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub text: String,
    /// Start time in seconds.
    pub start: f64,
    /// Duration in seconds.
    pub duration: f64,
}

impl TranscriptSegment {
    pub fn new(text: impl Into<String>, start: f64, duration: f64) -> Self {
        Self {
            text: text.into(),
            start,
            duration,
        }
    }
}

/// Failure kinds reported by a transcript source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranscriptError {
    /// No transcript exists for the video (or none in the requested languages).
    #[error("No transcript found for video {0}")]
    NotFound(String),

    /// The uploader disabled captions.
    #[error("Transcripts are disabled for video {0}")]
    Disabled(String),

    /// Network, parse, rate-limit or any other failure.
    #[error("{0}")]
    Transport(String),
}

/// Trait for transcript providers.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Fetch the caption segments for a video, in playback order.
    async fn fetch_transcript(
        &self,
        video_id: &VideoId,
    ) -> std::result::Result<Vec<TranscriptSegment>, TranscriptError>;
}

/// Join segment texts with single spaces, preserving order.
pub fn join_segments(segments: &[TranscriptSegment]) -> String {
    segments
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
