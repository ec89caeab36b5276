//! Conversation summarization over a generation backend.
//!
//! The summarizer asks the generator for a structured `<JSON>` payload and
//! retries a bounded number of times when the response carries no JSON at
//! all. Parsing is forgiving: a tagged block wins, untagged braces are a
//! fallback, and anything unparsable comes back as the raw response rather
//! than an error. The `anchors` field of a parsed payload is never trusted;
//! it is rebuilt from the summarized text by [`extract_anchors`].

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};
use windlass_core::{Generator, Result};

use crate::anchors::extract_anchors;
use crate::prompts;
use crate::window::build_summary_window;

pub struct Summarizer {
    generator: Arc<dyn Generator>,
    ceiling_tokens: usize,
    max_attempts: usize,
}

impl Summarizer {
    pub fn new(generator: Arc<dyn Generator>, ceiling_tokens: usize, max_attempts: usize) -> Self {
        Self {
            generator,
            ceiling_tokens,
            max_attempts,
        }
    }

    /// Summarize `text` into the compact line-oriented form used for
    /// storage. The `Anchors:` list is always rebuilt from `text` itself,
    /// displacing whatever anchors the model proposed. Falls back to the
    /// raw model response when the payload is not the expected object, and
    /// to an empty string when every attempt fails outright.
    pub async fn summarize(&self, text: &str) -> Result<String> {
        let response = self.request_summary(text).await?;
        match parse_summary(&response) {
            Some(mut summary) => {
                let anchors: Vec<Value> = extract_anchors(text)
                    .into_iter()
                    .map(Value::String)
                    .collect();
                summary.insert("anchors".to_string(), Value::Array(anchors));
                Ok(stringify_summary(&summary))
            }
            None => Ok(response),
        }
    }

    /// Compress an assistant response into a one-line recap, prefixed so a
    /// transcript reader can tell it from the original. A recap carries no
    /// anchor rebuild; the payload is rendered as returned.
    pub async fn compress_response(&self, text: &str) -> Result<String> {
        let response = self
            .request_summary(&format!("{}\n\n{text}", prompts::COMPRESS_TASK))
            .await?;
        let summary = match parse_summary(&response) {
            Some(summary) => stringify_summary(&summary),
            None => response,
        };
        Ok(format!("[Compressed] {summary}"))
    }

    async fn request_summary(&self, text: &str) -> Result<String> {
        let prompt = build_summary_window(text, self.ceiling_tokens)?;

        let mut last_response = String::new();
        for attempt in 1..=self.max_attempts {
            match self.generator.generate(&prompt).await {
                Ok(response) => {
                    last_response = response;
                    if looks_like_json(&last_response) {
                        break;
                    }
                    warn!(attempt, "Summary response carries no JSON, retrying");
                }
                Err(e) => {
                    warn!(attempt, error = %e, "Summary generation failed");
                }
            }
        }

        Ok(last_response)
    }
}

fn looks_like_json(text: &str) -> bool {
    match (text.find('{'), text.rfind('}')) {
        (Some(open), Some(close)) => close > open,
        _ => false,
    }
}

/// Extract the JSON payload from a model response. A `<JSON>...</JSON>`
/// block is authoritative when present; otherwise fall back to the span
/// from the first `{` to the last `}`.
fn extract_json_payload(text: &str) -> Option<&str> {
    if let Some(start) = text.find("<JSON>") {
        let inner = start + "<JSON>".len();
        if let Some(end) = text[inner..].find("</JSON>") {
            return Some(&text[inner..inner + end]);
        }
    }

    let open = text.find('{')?;
    let close = text.rfind('}')?;
    if close <= open {
        return None;
    }
    Some(&text[open..=close])
}

fn parse_summary(text: &str) -> Option<serde_json::Map<String, Value>> {
    let payload = extract_json_payload(text)?;
    match serde_json::from_str::<Value>(payload) {
        Ok(Value::Object(map)) => Some(map),
        Ok(_) => {
            debug!("Summary payload is valid JSON but not an object");
            None
        }
        Err(e) => {
            debug!(error = %e, "Summary payload failed to parse");
            None
        }
    }
}

/// Render the parsed summary object as `Title:`/`Goal:` lines and bulleted
/// `Events:`/`Anchors:` lists, skipping blank or missing fields.
fn stringify_summary(summary: &serde_json::Map<String, Value>) -> String {
    let mut lines: Vec<String> = Vec::new();

    for (key, label) in [("title", "Title"), ("goal", "Goal")] {
        if let Some(Value::String(s)) = summary.get(key) {
            let trimmed = s.trim();
            if !trimmed.is_empty() {
                lines.push(format!("{label}: {trimmed}"));
            }
        }
    }

    for (key, header) in [("events", "Events:"), ("anchors", "Anchors:")] {
        if let Some(Value::Array(items)) = summary.get(key) {
            if items.is_empty() {
                continue;
            }
            lines.push(header.to_string());
            for item in items {
                if let Value::String(s) = item {
                    let trimmed = s.trim();
                    if !trimmed.is_empty() {
                        lines.push(format!("- {trimmed}"));
                    }
                }
            }
        }
    }

    lines.join("\n")
}
