//! Glean - YouTube video insights
//!
//! Turns a YouTube URL into an LLM-written Markdown summary of the video's
//! captions, and renders such summaries to PDF.
//!
//! # Architecture
//!
//! - `config` - Configuration and prompt templates
//! - `video_source` - Video id extraction and title lookup
//! - `transcript` - Caption retrieval
//! - `llm` - Text generation providers (Gemini, OpenAI)
//! - `render` - Markdown to PDF export
//! - `orchestrator` - Pipeline coordination
//! - `server` - HTTP API and front-end
//!
//! # Example
//!
//! ```rust,no_run
//! use glean::config::Settings;
//! use glean::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(&settings)?;
//!
//!     let result = orchestrator
//!         .generate_insights("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
//!         .await?;
//!     println!("{}\n\n{}", result.title, result.insights);
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod openai;
pub mod orchestrator;
pub mod render;
pub mod server;
pub mod transcript;
pub mod video_source;

pub use error::{GleanError, Result};
