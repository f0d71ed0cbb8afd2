//! Wire framing for stream events.

use super::events::ResponsesStreamEvent;

/// Renders one Server-Sent Events frame: `event: <type>\ndata: <json>\n\n`.
pub fn frame(event: &ResponsesStreamEvent) -> String {
    format!("event: {}\ndata: {}\n\n", event.event_type(), encode(event))
}

/// Renders one event as a single JSON line, newline included.
pub fn json_line(event: &ResponsesStreamEvent) -> String {
    let mut line = encode(event);
    line.push('\n');

    line
}

fn encode(event: &ResponsesStreamEvent) -> String {
    sonic_rs::to_string(event).unwrap_or_else(|e| {
        log::error!("Failed to serialize {} event: {e}", event.event_type());
        r#"{"type":"error","code":"serialization_failed","message":"serialization failed"}"#.to_string()
    })
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::{frame, json_line};
    use crate::stream::events::{ResponsesStreamEvent, ResponsesStreamEventPayload};

    fn delta_event() -> ResponsesStreamEvent {
        ResponsesStreamEvent {
            payload: ResponsesStreamEventPayload::OutputTextDelta {
                output_index: 0,
                content_index: 0,
                item_id: Some("item_0".to_string()),
                delta: "Hi".to_string(),
            },
            sequence_number: 4,
        }
    }

    #[test]
    fn sse_frame() {
        let expected = indoc! {r#"
            event: response.output_text.delta
            data: {"type":"response.output_text.delta","output_index":0,"content_index":0,"item_id":"item_0","delta":"Hi","sequence_number":4}

        "#};

        assert_eq!(frame(&delta_event()), expected);
    }

    #[test]
    fn json_lines() {
        let line = json_line(&delta_event());

        assert!(line.ends_with("}\n"));
        assert_eq!(line.matches('\n').count(), 1);
        assert!(line.starts_with(r#"{"type":"response.output_text.delta""#));
    }
}
