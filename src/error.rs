//! Error types for Glean.

use crate::llm::GenerationError;
use crate::render::RenderError;
use crate::transcript::TranscriptError;
use thiserror::Error;

/// Library-level error type for Glean operations.
#[derive(Error, Debug)]
pub enum GleanError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid YouTube video URL provided.")]
    InvalidUrl,

    #[error("No transcript available for this video (e.g., no captions, private video).")]
    TranscriptNotFound,

    #[error("Transcript was fetched but is empty.")]
    TranscriptEmpty,

    #[error("Transcripts are disabled for this video.")]
    TranscriptsDisabled,

    #[error("Failed to fetch transcript: {0}")]
    TranscriptFetch(String),

    #[error("Failed to generate insights from the LLM.")]
    GenerationFailed,

    #[error("An error occurred while generating insights: {0}")]
    Generation(String),

    #[error("PDF generation failed: {0}")]
    Render(String),

    #[error("Video metadata error: {0}")]
    Metadata(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl From<TranscriptError> for GleanError {
    fn from(err: TranscriptError) -> Self {
        match err {
            TranscriptError::NotFound(_) => GleanError::TranscriptNotFound,
            TranscriptError::Disabled(_) => GleanError::TranscriptsDisabled,
            TranscriptError::Transport(msg) => GleanError::TranscriptFetch(msg),
        }
    }
}

impl From<GenerationError> for GleanError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::Empty => GleanError::GenerationFailed,
            GenerationError::Transport(msg) => GleanError::Generation(msg),
        }
    }
}

impl From<RenderError> for GleanError {
    fn from(err: RenderError) -> Self {
        GleanError::Render(err.to_string())
    }
}

/// Result type alias for Glean operations.
pub type Result<T> = std::result::Result<T, GleanError>;
