#![forbid(unsafe_code)]

//! Conversion of stored log messages into the HTML fragments appended by the
//! browser tail loop.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

pub const UNKNOWN_CLASS: &str = "unknown";
pub const NO_NEW_LOGS: &str = "No new logs";

// Game clients prefix lines like `00/00 12:34:56  [Warning] ...`.
static LEVEL_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"  \[([A-Za-z0-9_]+)\] ").expect("level tag pattern"));

/// CSS class for a message: its bracketed level tag lowercased, or `unknown`.
pub fn classify(message: &str) -> String {
    LEVEL_TAG
        .captures(message)
        .and_then(|caps| caps.get(1))
        .map(|tag| tag.as_str().to_lowercase())
        .unwrap_or_else(|| UNKNOWN_CLASS.to_string())
}

pub fn render_fragment(message: &str) -> String {
    let class = classify(message);
    let body = message.replace("\r\n", "<br>").replace('\n', "<br>");
    format!("<pre class=\"{class}\">{body}</pre>")
}

/// Concatenates fragments in the order given. Offsets are positional, so the
/// caller must pass messages exactly as the store returned them.
pub fn render_fragments<I, S>(messages: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    messages
        .into_iter()
        .map(|message| render_fragment(message.as_ref()))
        .collect()
}

/// Body of `GET /logs/{commit}/{player}/new`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TailResponse {
    Fragments { html: String, count: usize },
    NoNewLogs { error: &'static str },
}

impl TailResponse {
    pub fn from_messages(messages: &[String]) -> Self {
        if messages.is_empty() {
            return Self::NoNewLogs { error: NO_NEW_LOGS };
        }
        Self::Fragments {
            html: render_fragments(messages),
            count: messages.len(),
        }
    }
}
