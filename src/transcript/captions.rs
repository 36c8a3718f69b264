//! Timed-text caption XML parsing.

use super::{TranscriptError, TranscriptSegment};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;
use std::sync::LazyLock;

static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("Invalid regex"));

/// Parse a YouTube timed-text document (`<transcript><text start dur>…</text></transcript>`).
///
/// Caption text arrives HTML-escaped inside XML, so entities are resolved
/// twice and any leftover markup is stripped.
pub fn parse_caption_xml(xml: &str) -> Result<Vec<TranscriptSegment>, TranscriptError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut segments = Vec::new();
    let mut current: Option<(f64, f64)> = None;
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"text" => {
                current = Some(timing(&e));
                text.clear();
            }
            Ok(Event::Text(e)) if current.is_some() => {
                match e.unescape() {
                    Ok(raw) => text.push_str(&raw),
                    Err(_) => text.push_str(&String::from_utf8_lossy(&e)),
                }
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"text" => {
                if let Some((start, duration)) = current.take() {
                    let cleaned = clean_text(&text);
                    if !cleaned.is_empty() {
                        segments.push(TranscriptSegment::new(cleaned, start, duration));
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(TranscriptError::Transport(format!(
                    "Failed to parse caption XML: {}",
                    e
                )))
            }
            _ => {}
        }
    }

    Ok(segments)
}

fn timing(e: &BytesStart<'_>) -> (f64, f64) {
    let mut start = 0.0;
    let mut duration = 0.0;
    for attr in e.attributes().flatten() {
        let value = String::from_utf8_lossy(attr.value.as_ref());
        match attr.key.as_ref() {
            b"start" => start = value.parse().unwrap_or(0.0),
            b"dur" => duration = value.parse().unwrap_or(0.0),
            _ => {}
        }
    }
    (start, duration)
}

fn clean_text(raw: &str) -> String {
    let unescaped = quick_xml::escape::unescape(raw)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.to_string());
    TAG_REGEX
        .replace_all(&unescaped, "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
