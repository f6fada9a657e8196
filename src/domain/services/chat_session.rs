#[cfg(test)]
#[path = "chat_session_test.rs"]
mod tests;

use std::collections::HashSet;

use anyhow::bail;
use anyhow::Result;
use futures::StreamExt;
use tokio::sync::watch;
use uuid::Uuid;

use super::classify;
use super::dispatch;
use super::FrameReader;
use super::Transcript;
use super::TranscriptStore;
use crate::domain::models::BackendBox;
use crate::domain::models::ChatRequest;
use crate::domain::models::FeedbackRequest;
use crate::domain::models::MessageId;
use crate::domain::models::Rating;
use crate::domain::models::UserRole;

/// One conversation with the backend. Created empty when a chat surface starts
/// and dropped with it; nothing is persisted.
pub struct ChatSession {
    id: String,
    backend: BackendBox,
    user_role: Option<UserRole>,
    store: TranscriptStore,
    rated: HashSet<MessageId>,
}

impl ChatSession {
    pub fn new(backend: BackendBox, user_role: Option<UserRole>) -> ChatSession {
        return ChatSession {
            id: ChatSession::create_id(),
            backend,
            user_role,
            store: TranscriptStore::default(),
            rated: HashSet::new(),
        };
    }

    pub fn create_id() -> String {
        return Uuid::new_v4()
            .to_string()
            .split('-')
            .enumerate()
            .filter_map(|(idx, str)| {
                if idx > 1 {
                    return None;
                }
                return Some(str);
            })
            .collect::<Vec<&str>>()
            .join("-");
    }

    pub fn id(&self) -> &str {
        return &self.id;
    }

    pub fn user_role(&self) -> Option<UserRole> {
        return self.user_role;
    }

    pub fn subscribe(&self) -> watch::Receiver<Transcript> {
        return self.store.subscribe();
    }

    pub fn transcript(&self) -> Transcript {
        return self.store.snapshot();
    }

    pub fn is_awaiting_response(&self) -> bool {
        return self.store.is_awaiting_response();
    }

    pub async fn health_check(&self) -> Result<()> {
        return self.backend.health_check().await;
    }

    /// Sends a question and streams the answer into the transcript. Blank
    /// input is ignored. Every failure ends up as an annotation on the answer,
    /// so there is nothing to return; observe the transcript instead.
    pub async fn send_message(&mut self, text: &str) {
        if text.trim().is_empty() {
            return;
        }

        let assistant_id = self.store.begin_turn(text);
        tracing::debug!(
            session_id = %self.id,
            message_id = %assistant_id,
            "Sending chat request"
        );

        if let Err(err) = self.stream_answer(assistant_id, text).await {
            tracing::error!(
                error = ?err,
                session_id = %self.id,
                message_id = %assistant_id,
                "Chat request failed"
            );
            self.store.annotate_failure(assistant_id, &err);
        }

        self.store.finish_turn();
    }

    async fn stream_answer(&self, assistant_id: MessageId, text: &str) -> Result<()> {
        let request = ChatRequest::new(text, self.user_role);
        let body = self.backend.stream_chat(request).await?;

        let mut frames = FrameReader::new(body);
        while let Some(frame) = frames.next().await {
            let frame = frame?;
            dispatch(&self.store, assistant_id, classify(&frame));
        }

        return Ok(());
    }

    /// Rates the latest answer. An answer can only be rated once it has
    /// finished streaming, and only once.
    pub async fn submit_feedback(&mut self, rating: Rating, comment: Option<String>) -> Result<()> {
        if self.store.is_awaiting_response() {
            bail!("Wait for the answer to finish before rating it.");
        }

        let transcript = self.store.snapshot();
        let message_id = match transcript.last_assistant() {
            Some(msg) => msg.id,
            None => bail!("There is no answer to rate yet."),
        };

        if self.rated.contains(&message_id) {
            bail!("You already rated this answer.");
        }

        let feedback = FeedbackRequest {
            chat_session_id: self.id.to_string(),
            message_id: message_id.to_string(),
            rating,
            user_id: None,
            comment,
        };
        self.backend.submit_feedback(feedback).await?;
        self.rated.insert(message_id);

        return Ok(());
    }
}
