//! CLI module for Glean.

pub mod commands;
mod output;

pub use output::Output;

use crate::config::LlmProvider;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Glean - YouTube video insights
///
/// Summarize YouTube videos from their captions with an LLM and export the
/// result as PDF, from a browser or the terminal.
#[derive(Parser, Debug)]
#[command(name = "glean")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "GLEAN_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// LLM selection flags shared by commands that generate insights.
#[derive(Args, Debug, Clone, Default)]
pub struct LlmArgs {
    /// LLM provider (gemini, openai); overrides llm.provider
    #[arg(long)]
    pub provider: Option<LlmProvider>,

    /// Model name; overrides llm.model
    #[arg(short, long)]
    pub model: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Host to bind to (defaults to server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (defaults to server.port)
        #[arg(short, long)]
        port: Option<u16>,

        #[command(flatten)]
        llm: LlmArgs,
    },

    /// Generate insights for a video from the terminal
    Insights {
        /// YouTube video URL
        url: String,

        /// Also export the insights as PDF to this path
        #[arg(long)]
        pdf: Option<PathBuf>,

        /// Write the Markdown insights to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        llm: LlmArgs,
    },

    /// Check system requirements and configuration
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}
