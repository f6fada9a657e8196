#[cfg(test)]
#[path = "message_test.rs"]
mod tests;

use std::fmt;

use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::StreamEvent;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageId(u64);

impl MessageId {
    pub fn new(id: u64) -> MessageId {
        return MessageId(id);
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(f, "{}", self.0);
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub title: String,
    pub url: String,
}

impl Citation {
    /// Label shown for a source. Falls back to the URL when the backend sent no
    /// title.
    pub fn label(&self) -> &str {
        if self.title.is_empty() {
            return &self.url;
        }

        return &self.title;
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    pub citations: Option<Vec<Citation>>,
    pub suggested_queries: Option<Vec<String>>,
}

impl Message {
    pub fn new_user(id: MessageId, text: &str) -> Message {
        return Message {
            id,
            role: Role::User,
            content: text.to_string(),
            citations: None,
            suggested_queries: None,
        };
    }

    /// Empty assistant message that is filled in while its answer streams.
    pub fn new_placeholder(id: MessageId) -> Message {
        return Message {
            id,
            role: Role::Assistant,
            content: "".to_string(),
            citations: None,
            suggested_queries: None,
        };
    }

    pub fn append(&mut self, text: &str) {
        self.content += text;
    }

    pub fn annotate(&mut self, label: &str, detail: &str) {
        self.content += &format!("\n\n[{label} {detail}]");
    }

    /// Applies a single stream event. Citations and suggestions replace any
    /// previous value, tokens and errors only ever grow the content.
    pub fn apply(&mut self, event: StreamEvent) {
        match event {
            StreamEvent::Token(text) => self.append(&text),
            StreamEvent::Citation(citations) => self.citations = Some(citations),
            StreamEvent::Suggestions(queries) => self.suggested_queries = Some(queries),
            StreamEvent::Error(detail) => self.annotate("Backend error:", &detail),
        }
    }
}
