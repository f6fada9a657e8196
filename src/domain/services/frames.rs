#[cfg(test)]
#[path = "frames_test.rs"]
mod tests;

use std::io;
use std::pin::Pin;
use std::task::Context;
use std::task::Poll;

use bytes::BytesMut;
use futures::Stream;
use tokio_util::codec::Decoder;
use tokio_util::codec::FramedRead;
use tokio_util::io::StreamReader;

use crate::domain::models::ByteStream;

const DELIMITER: &[u8] = b"\n\n";
const DATA_PREFIX: &str = "data: ";
const DONE_SENTINEL: &str = "[DONE]";

/// Splits a server-sent-event body into frames on blank lines.
///
/// Splitting happens on raw bytes. A newline is never part of a multi-byte
/// UTF-8 sequence, so a character cut in half between two reads stays intact
/// inside the buffered frame until its delimiter arrives.
#[derive(Default)]
pub struct SseFrameCodec {
    // Offset up to which the buffer is known to hold no delimiter.
    next_index: usize,
}

impl Decoder for SseFrameCodec {
    type Item = String;
    type Error = io::Error;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<String>, io::Error> {
        // Step back one byte in case the previous read ended on the first half
        // of the delimiter.
        let start = self.next_index.saturating_sub(DELIMITER.len() - 1);
        let found = buf[start..]
            .windows(DELIMITER.len())
            .position(|window| return window == DELIMITER);

        match found {
            Some(offset) => {
                let end = start + offset;
                let frame = buf.split_to(end + DELIMITER.len());
                self.next_index = 0;

                return Ok(Some(
                    String::from_utf8_lossy(&frame[..end]).to_string(),
                ));
            }
            None => {
                self.next_index = buf.len();
                return Ok(None);
            }
        }
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<String>, io::Error> {
        if let Some(frame) = self.decode(buf)? {
            return Ok(Some(frame));
        }

        if !buf.is_empty() {
            tracing::debug!(
                bytes = buf.len(),
                "Discarding unterminated frame at end of stream"
            );
            buf.clear();
        }
        self.next_index = 0;

        return Ok(None);
    }
}

/// Complete frames of a chat response body, in wire order.
pub struct FrameReader {
    inner: FramedRead<StreamReader<ByteStream, bytes::Bytes>, SseFrameCodec>,
}

impl FrameReader {
    pub fn new(body: ByteStream) -> FrameReader {
        return FrameReader {
            inner: FramedRead::new(StreamReader::new(body), SseFrameCodec::default()),
        };
    }
}

impl Stream for FrameReader {
    type Item = io::Result<String>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        return Pin::new(&mut self.inner).poll_next(cx);
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum FramePayload<'a> {
    /// JSON payload of a `data: ` frame.
    Data(&'a str),
    /// The `[DONE]` sentinel. Marks the end of content but carries nothing.
    Done,
    /// Anything that isn't a `data: ` frame.
    Ignored,
}

pub fn classify(frame: &str) -> FramePayload<'_> {
    match frame.strip_prefix(DATA_PREFIX) {
        Some(DONE_SENTINEL) => return FramePayload::Done,
        Some(payload) => return FramePayload::Data(payload),
        None => return FramePayload::Ignored,
    }
}
