#[cfg(test)]
#[path = "transcript_test.rs"]
mod tests;

use tokio::sync::watch;

use crate::domain::models::Message;
use crate::domain::models::MessageId;
use crate::domain::models::Role;
use crate::domain::models::StreamEvent;

/// Everything an observer needs to render a conversation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Transcript {
    pub messages: Vec<Message>,
    pub awaiting_response: bool,
}

impl Transcript {
    pub fn message(&self, id: MessageId) -> Option<&Message> {
        return self.messages.iter().find(|msg| return msg.id == id);
    }

    pub fn last_assistant(&self) -> Option<&Message> {
        return self
            .messages
            .iter()
            .rev()
            .find(|msg| return msg.role == Role::Assistant);
    }
}

/// Owns a single conversation and pushes every mutation to its subscribers.
///
/// Mutations go through `watch::Sender::send_modify`, which applies the change
/// whether or not anyone is still subscribed.
pub struct TranscriptStore {
    tx: watch::Sender<Transcript>,
    next_id: u64,
}

impl Default for TranscriptStore {
    fn default() -> TranscriptStore {
        let (tx, _rx) = watch::channel(Transcript::default());
        return TranscriptStore { tx, next_id: 1 };
    }
}

impl TranscriptStore {
    pub fn subscribe(&self) -> watch::Receiver<Transcript> {
        return self.tx.subscribe();
    }

    pub fn snapshot(&self) -> Transcript {
        return self.tx.borrow().clone();
    }

    pub fn messages(&self) -> Vec<Message> {
        return self.tx.borrow().messages.clone();
    }

    pub fn is_awaiting_response(&self) -> bool {
        return self.tx.borrow().awaiting_response;
    }

    fn create_id(&mut self) -> MessageId {
        let id = MessageId::new(self.next_id);
        self.next_id += 1;
        return id;
    }

    /// Appends the user's message and an empty assistant placeholder, and marks
    /// the transcript as awaiting a response. Observers see all three changes
    /// at once. Returns the placeholder's id.
    pub fn begin_turn(&mut self, text: &str) -> MessageId {
        let user_id = self.create_id();
        let assistant_id = self.create_id();

        self.tx.send_modify(|transcript| {
            transcript.messages.push(Message::new_user(user_id, text));
            transcript
                .messages
                .push(Message::new_placeholder(assistant_id));
            transcript.awaiting_response = true;
        });

        return assistant_id;
    }

    /// Applies a stream event to the assistant message `id`. User messages are
    /// never touched.
    pub fn apply(&self, id: MessageId, event: StreamEvent) {
        self.modify_assistant(id, |msg| {
            tracing::debug!(message_id = %id, kind = event.kind(), "Applying stream event");
            msg.apply(event);
        });
    }

    /// Appends a system error annotation for a failed request or stream.
    pub fn annotate_failure(&self, id: MessageId, err: &anyhow::Error) {
        self.modify_assistant(id, |msg| {
            msg.annotate("System error:", &format!("Network error ({err})"));
        });
    }

    pub fn finish_turn(&self) {
        self.tx.send_modify(|transcript| {
            transcript.awaiting_response = false;
        });
    }

    fn modify_assistant<F: FnOnce(&mut Message)>(&self, id: MessageId, f: F) {
        self.tx.send_if_modified(|transcript| {
            let target = transcript
                .messages
                .iter_mut()
                .find(|msg| return msg.id == id && msg.role == Role::Assistant);

            if let Some(msg) = target {
                f(msg);
                return true;
            }

            tracing::debug!(message_id = %id, "No assistant message to update");
            return false;
        });
    }
}
