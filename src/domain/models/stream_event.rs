#[cfg(test)]
#[path = "stream_event_test.rs"]
mod tests;

use anyhow::Result;
use serde_derive::Deserialize;

use super::Citation;

/// One `data:` payload from the chat stream. Consumed as soon as it has been
/// applied to the transcript.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamEvent {
    Token(String),
    Citation(Vec<Citation>),
    Suggestions(Vec<String>),
    Error(String),
}

#[derive(Deserialize)]
struct RawStreamEvent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    content: serde_json::Value,
}

impl StreamEvent {
    /// Parses a frame payload. Returns `Ok(None)` for well formed events with a
    /// tag this client doesn't know, and an error when the payload isn't JSON or
    /// the content doesn't match its tag.
    pub fn from_payload(payload: &str) -> Result<Option<StreamEvent>> {
        let raw: RawStreamEvent = serde_json::from_str(payload)?;

        let event = match raw.kind.as_str() {
            "token" => StreamEvent::Token(serde_json::from_value(raw.content)?),
            "citation" => StreamEvent::Citation(serde_json::from_value(raw.content)?),
            "suggestions" => StreamEvent::Suggestions(serde_json::from_value(raw.content)?),
            "error" => StreamEvent::Error(serde_json::from_value(raw.content)?),
            _ => return Ok(None),
        };

        return Ok(Some(event));
    }

    pub fn kind(&self) -> &'static str {
        match self {
            StreamEvent::Token(_) => return "token",
            StreamEvent::Citation(_) => return "citation",
            StreamEvent::Suggestions(_) => return "suggestions",
            StreamEvent::Error(_) => return "error",
        }
    }
}
