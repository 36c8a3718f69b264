//! LLM text generation.
//!
//! A generator turns a prompt into Markdown. An empty or malformed candidate
//! is reported separately from transport failures.

mod gemini;
mod openai;

pub use gemini::GeminiGenerator;
pub use openai::OpenAIGenerator;

use crate::config::{LlmProvider, LlmSettings};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Failure kinds reported by a generator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// The service answered but produced no usable text.
    #[error("LLM returned no usable content")]
    Empty,

    /// Network, authentication, quota or any other service failure.
    #[error("{0}")]
    Transport(String),
}

/// Trait for text generation services.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a completion for `prompt`.
    async fn generate(&self, prompt: &str) -> std::result::Result<String, GenerationError>;

    /// Provider name, for logging.
    fn provider_name(&self) -> &str;
}

/// Build the generator selected in settings.
///
/// A missing API key is logged but not fatal; requests fail when made.
pub fn create_generator(settings: &LlmSettings) -> crate::error::Result<Arc<dyn Generator>> {
    let api_key = settings.resolve_api_key();
    if api_key.is_none() {
        warn!(
            "{} is not set; insight generation will fail until it is configured",
            settings.api_key_env
        );
    }

    info!("Using {} generator ({})", settings.provider, settings.model);

    let generator: Arc<dyn Generator> = match settings.provider {
        LlmProvider::Gemini => Arc::new(GeminiGenerator::new(
            api_key.unwrap_or_default(),
            &settings.model,
            settings.temperature,
            settings.timeout(),
        )?),
        LlmProvider::OpenAI => Arc::new(OpenAIGenerator::new(
            api_key.as_deref(),
            &settings.model,
            settings.temperature,
            settings.timeout(),
        )?),
    };

    Ok(generator)
}

/// Treat whitespace-only output as no output.
pub(crate) fn non_empty(text: Option<String>) -> std::result::Result<String, GenerationError> {
    match text {
        Some(t) if !t.trim().is_empty() => Ok(t),
        _ => Err(GenerationError::Empty),
    }
}
