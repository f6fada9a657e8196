#[cfg(test)]
#[path = "demux_test.rs"]
mod tests;

use crate::domain::models::MessageId;
use crate::domain::models::StreamEvent;
use crate::domain::services::FramePayload;
use crate::domain::services::TranscriptStore;

/// Parses a frame payload into an event. Frames that can't be parsed or that
/// carry an unknown tag are logged and skipped so that one bad frame never
/// ends the answer.
pub fn demultiplex(payload: &str) -> Option<StreamEvent> {
    match StreamEvent::from_payload(payload) {
        Ok(Some(event)) => return Some(event),
        Ok(None) => {
            tracing::debug!(payload, "Skipping stream event with unknown type");
            return None;
        }
        Err(err) => {
            tracing::warn!(error = ?err, payload, "Failed to parse stream event");
            return None;
        }
    }
}

/// Routes one complete frame to the assistant message `id`.
pub fn dispatch(store: &TranscriptStore, id: MessageId, payload: FramePayload<'_>) {
    match payload {
        FramePayload::Data(data) => {
            if let Some(event) = demultiplex(data) {
                store.apply(id, event);
            }
        }
        FramePayload::Done => {
            tracing::debug!(message_id = %id, "Stream signalled done");
        }
        FramePayload::Ignored => {
            tracing::debug!(message_id = %id, "Ignoring non-data frame");
        }
    }
}
