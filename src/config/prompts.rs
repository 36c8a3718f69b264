//! Prompt templates for Glean.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::warn;

/// Placeholder filled with the transcript. Reserved; never taken from config variables.
const TRANSCRIPT_VAR: &str = "transcript";

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub insights: InsightsPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// Prompts for transcript summarization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightsPrompts {
    pub user: String,
}

impl Default for InsightsPrompts {
    fn default() -> Self {
        Self {
            user: r#"Analyze the following video content (transcript) and provide key insights,
summarize the main points, and suggest potential discussion topics or related areas.

Format your answer as Markdown with exactly these sections:

## Summary
A short paragraph summarizing the video.

## Key Insights
A bulleted list of the most important insights.

## Discussion Topics
A short bulleted list of discussion topics or related areas to explore.

Video Content: "{{transcript}}""#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
            if prompts.variables.remove(TRANSCRIPT_VAR).is_some() {
                warn!(
                    "Ignoring prompt variable '{}': it is reserved for the video transcript",
                    TRANSCRIPT_VAR
                );
            }
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let insights_path = custom_path.join("insights.toml");
            if insights_path.exists() {
                let content = std::fs::read_to_string(&insights_path)?;
                prompts.insights = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Build the summarization prompt for a transcript.
    ///
    /// The transcript is substituted last so placeholder-looking text inside
    /// captions is never expanded.
    pub fn insights_prompt(&self, transcript: &str) -> String {
        let vars: HashMap<String, String> = self
            .variables
            .iter()
            .filter(|(k, _)| k.as_str() != TRANSCRIPT_VAR)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let rendered = Self::render(&self.insights.user, &vars);
        rendered.replace(&format!("{{{{{}}}}}", TRANSCRIPT_VAR), transcript)
    }
}
