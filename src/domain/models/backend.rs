#[cfg(test)]
#[path = "backend_test.rs"]
mod tests;

use std::io;

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::UserRole;

/// Raw response body of a chat request, pulled chunk by chunk.
pub type ByteStream = BoxStream<'static, io::Result<Bytes>>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub user_role: Option<UserRole>,
}

impl ChatRequest {
    pub fn new(message: &str, user_role: Option<UserRole>) -> ChatRequest {
        return ChatRequest {
            message: message.to_string(),
            user_role,
        };
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    ThumbsUp,
    ThumbsDown,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub chat_session_id: String,
    pub message_id: String,
    pub rating: Rating,
    pub user_id: Option<String>,
    pub comment: Option<String>,
}

#[async_trait]
pub trait Backend {
    /// Used at startup to verify the backend is reachable before the first
    /// question is asked.
    async fn health_check(&self) -> Result<()>;

    /// Sends a question and returns the raw server-sent-event body.
    ///
    /// A non-2xx status, or a failure to reach the backend at all, is an error.
    /// A successful response with an empty body is an empty stream, not an
    /// error.
    async fn stream_chat(&self, request: ChatRequest) -> Result<ByteStream>;

    /// Records a thumbs up or down on an answer.
    async fn submit_feedback(&self, feedback: FeedbackRequest) -> Result<()>;
}

pub type BackendBox = Box<dyn Backend + Send + Sync>;
