//! HTML-to-PDF rendering through a wkhtmltopdf-compatible executable.

use super::{PdfRenderer, RenderError};
use crate::config::PdfSettings;
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, instrument, warn};

/// Arguments that make wkhtmltopdf read HTML from stdin and write PDF to stdout.
const DEFAULT_ARGS: &[&str] = &["--quiet", "--encoding", "utf-8", "-", "-"];

/// Renders HTML by piping it through an external command.
pub struct WkhtmltopdfRenderer {
    command: String,
    args: Vec<String>,
    timeout: Duration,
}

impl WkhtmltopdfRenderer {
    pub fn new(settings: &PdfSettings) -> Self {
        Self::with_args(
            &settings.command,
            DEFAULT_ARGS.iter().map(|a| a.to_string()).collect(),
            settings.timeout(),
        )
    }

    /// Use a custom command line. The command must read HTML on stdin and write PDF to stdout.
    pub fn with_args(command: &str, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            command: command.to_string(),
            args,
            timeout,
        }
    }
}

#[async_trait]
impl PdfRenderer for WkhtmltopdfRenderer {
    #[instrument(skip(self, html), fields(command = %self.command, html_len = html.len()))]
    async fn render(&self, html: &str) -> std::result::Result<Vec<u8>, RenderError> {
        let mut child = Command::new(&self.command)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    RenderError::ToolNotFound(self.command.clone())
                } else {
                    RenderError::Failed(format!("Failed to run {}: {}", self.command, e))
                }
            })?;

        // Feed stdin from a separate task so a full stdout pipe can't deadlock us.
        let writer = child.stdin.take().map(|mut stdin| {
            let input = html.to_string();
            tokio::spawn(async move {
                if let Err(e) = stdin.write_all(input.as_bytes()).await {
                    debug!("Renderer closed stdin early: {}", e);
                }
            })
        });

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(RenderError::Failed(format!(
                    "{} execution failed: {}",
                    self.command, e
                )))
            }
            Err(_) => {
                warn!("PDF rendering timed out");
                return Err(RenderError::Timeout(self.timeout));
            }
        };

        if let Some(writer) = writer {
            let _ = writer.await;
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RenderError::Failed(format!(
                "{} failed: {}",
                self.command,
                stderr.trim()
            )));
        }

        if output.stdout.is_empty() {
            return Err(RenderError::Failed(format!(
                "{} produced no output",
                self.command
            )));
        }

        debug!("Rendered {} bytes of PDF", output.stdout.len());
        Ok(output.stdout)
    }
}
