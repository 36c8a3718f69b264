//! OpenAI chat-completions generator.

use super::{non_empty, GenerationError, Generator};
use crate::error::Result;
use crate::openai::create_client;
use async_openai::error::OpenAIError;
use async_openai::types::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{info, instrument};

/// OpenAI-backed generator.
pub struct OpenAIGenerator {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    temperature: Option<f32>,
}

impl OpenAIGenerator {
    pub fn new(
        api_key: Option<&str>,
        model: &str,
        temperature: Option<f32>,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            client: create_client(api_key, timeout)?,
            model: model.to_string(),
            temperature,
        })
    }
}

#[async_trait]
impl Generator for OpenAIGenerator {
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> std::result::Result<String, GenerationError> {
        let message = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(&self.model).messages(vec![message.into()]);
        if let Some(temperature) = self.temperature {
            args.temperature(temperature);
        }
        let request = args
            .build()
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        let response = self.client.chat().create(request).await.map_err(|e| match e {
            OpenAIError::JSONDeserialize(_) => GenerationError::Empty,
            other => GenerationError::Transport(format!("OpenAI API error: {}", other)),
        })?;

        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content);

        let text = non_empty(text)?;
        info!("OpenAI generated {} characters", text.len());
        Ok(text)
    }

    fn provider_name(&self) -> &str {
        "openai"
    }
}
