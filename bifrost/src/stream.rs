use std::path::Path;

use config::{StreamConfig, StreamFraming};
use llm::{
    messages::chat::ChatStreamChunk,
    stream::{ResponsesStreamEvent, StreamStatePool, sse},
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt};

use crate::io;

/// Translates a chat chunk stream into Responses events until the input ends.
///
/// A line that does not parse fails the stream. Input that ends before a
/// finish reason fails it too, so every stream ends with a terminal event.
pub async fn run(input: Option<&Path>, framing: StreamFraming, config: &StreamConfig) -> anyhow::Result<()> {
    let pool = StreamStatePool::with_prewarm(config.pool_capacity, config.prewarm);
    let mut state = pool.acquire();

    let mut lines = io::reader(input).await?.lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        let Some(payload) = chunk_payload(&line) else {
            continue;
        };

        let events = match sonic_rs::from_str::<ChatStreamChunk>(payload) {
            Ok(chunk) => state.process_chunk(&chunk),
            Err(e) => {
                log::error!("Failed to parse stream chunk: {e}");
                state.fail("invalid_chunk", e.to_string())
            }
        };

        stdout.write_all(render(&events, framing).as_bytes()).await?;

        if state.is_terminated() {
            break;
        }
    }

    if !state.is_terminated() {
        log::warn!("Stream input ended without a finish reason");

        let events = state.fail("stream_incomplete", "stream ended without a finish reason");
        stdout.write_all(render(&events, framing).as_bytes()).await?;
    }

    log::debug!("Stream finished after {} events", state.sequence_number());
    stdout.flush().await?;

    Ok(())
}

/// Extracts the JSON payload of one input line.
///
/// Accepts bare JSON as well as SSE `data:` lines. Blank lines, comments,
/// `event:` lines and the `[DONE]` marker carry no chunk.
fn chunk_payload(line: &str) -> Option<&str> {
    let line = line.trim();

    if line.starts_with(':') || line.starts_with("event:") {
        return None;
    }

    let payload = match line.strip_prefix("data:") {
        Some(rest) => rest.trim_start(),
        None => line,
    };

    match payload {
        "" | "[DONE]" => None,
        payload => Some(payload),
    }
}

fn render(events: &[ResponsesStreamEvent], framing: StreamFraming) -> String {
    let encode = match framing {
        StreamFraming::Sse => sse::frame,
        StreamFraming::JsonLines => sse::json_line,
    };

    events.iter().map(encode).collect()
}

#[cfg(test)]
mod tests {
    use config::StreamFraming;
    use indoc::indoc;
    use llm::{
        messages::chat::ChatStreamChunk,
        stream::ChatToResponsesStreamState,
    };

    use super::{chunk_payload, render};

    #[test]
    fn payload_extraction() {
        assert_eq!(chunk_payload(r#"data: {"id":"1"}"#), Some(r#"{"id":"1"}"#));
        assert_eq!(chunk_payload(r#"  {"id":"1"}  "#), Some(r#"{"id":"1"}"#));
        assert_eq!(chunk_payload("data: [DONE]"), None);
        assert_eq!(chunk_payload("[DONE]"), None);
        assert_eq!(chunk_payload(""), None);
        assert_eq!(chunk_payload(": keep-alive"), None);
        assert_eq!(chunk_payload("event: message"), None);
    }

    #[test]
    fn renders_json_lines() {
        let chunk: ChatStreamChunk = sonic_rs::from_str(
            r#"{"id":"1","created":7,"model":"m","choices":[{"delta":{"role":"assistant"}}]}"#,
        )
        .unwrap();

        let mut state = ChatToResponsesStreamState::new();
        let events = state.process_chunk(&chunk);

        let output = render(&events, StreamFraming::JsonLines);

        let expected = indoc! {r#"
            {"type":"response.created","response":{"id":"1","object":"response","created_at":7,"model":"m","status":"in_progress","output":[]},"sequence_number":0}
            {"type":"response.in_progress","response":{"id":"1","object":"response","created_at":7,"model":"m","status":"in_progress","output":[]},"sequence_number":1}
        "#};

        assert_eq!(output, expected);
    }

    #[test]
    fn renders_sse_frames() {
        let mut state = ChatToResponsesStreamState::new();
        let events = state.fail("invalid_chunk", "expected value");

        let output = render(&events, StreamFraming::Sse);

        assert!(output.starts_with("event: error\ndata: "));
        assert!(output.contains("\n\nevent: response.failed\ndata: "));
        assert!(output.ends_with("\n\n"));
    }
}
