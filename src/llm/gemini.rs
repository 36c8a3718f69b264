//! Google Gemini generator using the `generateContent` REST API.

use super::{non_empty, GenerationError, Generator};
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini-backed generator.
pub struct GeminiGenerator {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiGenerator {
    pub fn new(
        api_key: String,
        model: &str,
        temperature: Option<f32>,
        timeout: Duration,
    ) -> Result<Self> {
        Self::with_api_base(GEMINI_API_BASE, api_key, model, temperature, timeout)
    }

    /// Create a generator pointed at a custom API base URL.
    pub fn with_api_base(
        api_base: &str,
        api_key: String,
        model: &str,
        temperature: Option<f32>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key,
            model: model.to_string(),
            temperature,
        })
    }

    fn model_path(&self) -> String {
        if self.model.starts_with("models/") {
            self.model.clone()
        } else {
            format!("models/{}", self.model)
        }
    }
}

#[async_trait]
impl Generator for GeminiGenerator {
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> std::result::Result<String, GenerationError> {
        if self.api_key.is_empty() {
            return Err(GenerationError::Transport(
                "Gemini API key is not configured".to_string(),
            ));
        }

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: self.temperature.map(|temperature| GenerationConfig { temperature }),
        };

        let url = format!("{}/{}:generateContent", self.api_base, self.model_path());
        debug!("Calling Gemini generateContent");

        let response = self
            .client
            .post(&url)
            .query(&[("key", &self.api_key)])
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::Transport(format!("Gemini request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Transport(format!(
                "Gemini returned {}: {}",
                status, body
            )));
        }

        // A body that doesn't match the candidate shape is a malformed candidate.
        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|_| GenerationError::Empty)?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text);

        let text = non_empty(text)?;
        info!("Gemini generated {} characters", text.len());
        Ok(text)
    }

    fn provider_name(&self) -> &str {
        "gemini"
    }
}
