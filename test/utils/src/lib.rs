/// Wraps a JSON payload into a single SSE frame, delimiter included.
pub fn sse_frame(payload: &str) -> String {
    return format!("data: {payload}\n\n");
}

/// Token, token, done. The stream the backend sends for "How do I login?".
pub fn login_stream_fixture() -> String {
    return [
        sse_frame(r#"{"type":"token","content":"To "}"#),
        sse_frame(r#"{"type":"token","content":"login."}"#),
        sse_frame("[DONE]"),
    ]
    .join("");
}

/// A complete answer with sources and follow-up questions.
pub fn full_answer_fixture() -> String {
    return [
        sse_frame(r#"{"type":"token","content":"Open the "}"#),
        sse_frame(r#"{"type":"token","content":"app and tap "}"#),
        sse_frame(r#"{"type":"token","content":"«Logg inn»."}"#),
        sse_frame(r#"{"type":"citation","content":[{"title":"Guide","url":"https://x"}]}"#),
        sse_frame(r#"{"type":"suggestions","content":["How do I reset my password?","Where is my ID card?"]}"#),
        sse_frame("[DONE]"),
    ]
    .join("");
}

/// Splits `bytes` at every offset in `offsets`, keeping order. Offsets must be
/// ascending and within bounds.
pub fn split_at_offsets(bytes: &[u8], offsets: &[usize]) -> Vec<Vec<u8>> {
    let mut chunks = vec![];
    let mut start = 0;
    for offset in offsets {
        chunks.push(bytes[start..*offset].to_vec());
        start = *offset;
    }
    chunks.push(bytes[start..].to_vec());

    return chunks;
}
