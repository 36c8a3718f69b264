//! Markdown to PDF export.
//!
//! Markdown is converted to HTML in-process, wrapped with a title and an
//! attribution line, and handed to an external HTML-to-PDF renderer.

mod pdf;

pub use pdf::WkhtmltopdfRenderer;

use crate::video_source::PLACEHOLDER_TITLE;
use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use pulldown_cmark::{html, Options, Parser};
use std::time::Duration;
use thiserror::Error;

/// Subheading placed under the title of every exported document.
pub const ATTRIBUTION: &str = "Summarized from YouTube captions by Glean";

/// Prefix of every exported file name.
pub const FILENAME_PREFIX: &str = "[summarized]";

/// Failure kinds reported by a PDF renderer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("{0} not found. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("{0}")]
    Failed(String),

    #[error("renderer timed out after {0:?}")]
    Timeout(Duration),
}

/// Trait for HTML-to-PDF renderers.
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render(&self, html: &str) -> std::result::Result<Vec<u8>, RenderError>;
}

/// A rendered PDF and the name it should be downloaded under.
#[derive(Debug, Clone)]
pub struct PdfDocument {
    pub title: String,
    pub bytes: Vec<u8>,
}

impl PdfDocument {
    /// File name with only characters that are safe on common file systems.
    pub fn filename(&self) -> String {
        format!("{}{}.pdf", FILENAME_PREFIX, sanitize_title(&self.title, false))
    }

    /// `Content-Disposition` header value carrying an ASCII fallback and an
    /// RFC 5987 encoded UTF-8 name.
    pub fn content_disposition(&self) -> String {
        let ascii = format!("{}{}.pdf", FILENAME_PREFIX, sanitize_title(&self.title, true));
        let encoded = utf8_percent_encode(&self.filename(), NON_ALPHANUMERIC).to_string();
        format!("attachment; filename=\"{}\"; filename*=UTF-8''{}", ascii, encoded)
    }
}

/// Convert Markdown to an HTML fragment.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Compose the document handed to the renderer: title, attribution, then body.
///
/// The title is inserted as given.
pub fn compose_document(title: &str, body_html: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"></head>\n<body>\n<h1>{}</h1>\n<h3>{}</h3>\n{}</body>\n</html>\n",
        title, ATTRIBUTION, body_html
    )
}

fn sanitize_title(title: &str, ascii_only: bool) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| {
            let illegal = c.is_control()
                || matches!(c, '"' | '\\' | '/' | ':' | '*' | '?' | '<' | '>' | '|')
                || (ascii_only && !c.is_ascii());
            if illegal {
                '_'
            } else {
                c
            }
        })
        .collect();

    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        PLACEHOLDER_TITLE.to_string()
    } else {
        trimmed.to_string()
    }
}
