//! Configuration module for Glean.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{InsightsPrompts, Prompts};
pub use settings::{
    GeneralSettings, LlmProvider, LlmSettings, PdfSettings, PromptSettings, ServerSettings,
    Settings, YoutubeSettings,
};
