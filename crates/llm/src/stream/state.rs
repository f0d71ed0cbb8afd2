use std::collections::HashMap;

use indexmap::IndexMap;

use super::events::{ResponsesStreamEvent, ResponsesStreamEventPayload};
use crate::{
    error::{MuxError, MuxResult},
    messages::{
        MessageContent,
        chat::{ChatStreamChunk, ChatToolCall, LlmUsage},
        responses::{
            ResponsesContentBlock, ResponsesError, ResponsesItem, ResponsesItemType, ResponsesResponse,
            ResponsesRole, ResponsesStatus,
        },
    },
};

const TEXT_ITEM_KEY: &str = "text";
const TEXT_CONTENT_INDEX: usize = 0;
const TOOL_CONTENT_INDEX: usize = 1;

/// Turns Chat Completions stream chunks into Responses stream events.
///
/// One instance belongs to exactly one stream. Feed every chunk, in order, to
/// [`process_chunk`](Self::process_chunk); the returned events are ready to be
/// framed and written out. The state becomes terminal after the chunk with a
/// finish reason, or after [`fail`](Self::fail).
///
/// Output indices are handed out in the order items open: the text item takes
/// the next free slot when it opens (index 0 on a normal stream), and every
/// tool call takes the next free slot after that. No two items share a slot.
#[derive(Debug)]
pub struct ChatToResponsesStreamState {
    /// Tool call id to the arguments received so far, in first-seen order.
    tool_argument_buffers: IndexMap<String, String>,
    /// Tool call id, or the text item key, to the item id sent downstream.
    item_ids: HashMap<String, String>,
    tool_call_names: HashMap<String, String>,
    tool_call_index_to_id: HashMap<u16, String>,
    tool_call_output_indices: HashMap<String, usize>,
    message_id: Option<String>,
    model: Option<String>,
    created_at: u64,
    usage: Option<LlmUsage>,
    seen_first_chunk: bool,
    has_emitted_created: bool,
    has_emitted_in_progress: bool,
    text_item_added: bool,
    text_item_closed: bool,
    text_item_has_content: bool,
    text_output_index: usize,
    current_output_index: usize,
    sequence_number: u64,
    terminated: bool,
}

impl Default for ChatToResponsesStreamState {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatToResponsesStreamState {
    pub fn new() -> Self {
        Self {
            tool_argument_buffers: IndexMap::new(),
            item_ids: HashMap::new(),
            tool_call_names: HashMap::new(),
            tool_call_index_to_id: HashMap::new(),
            tool_call_output_indices: HashMap::new(),
            message_id: None,
            model: None,
            created_at: unix_now(),
            usage: None,
            seen_first_chunk: false,
            has_emitted_created: false,
            has_emitted_in_progress: false,
            text_item_added: false,
            text_item_closed: false,
            text_item_has_content: false,
            text_output_index: 0,
            current_output_index: 0,
            sequence_number: 0,
            terminated: false,
        }
    }

    /// Clears every map and resets every counter and flag, keeping the
    /// allocated capacity.
    pub fn reset(&mut self) {
        self.tool_argument_buffers.clear();
        self.item_ids.clear();
        self.tool_call_names.clear();
        self.tool_call_index_to_id.clear();
        self.tool_call_output_indices.clear();
        self.message_id = None;
        self.model = None;
        self.created_at = unix_now();
        self.usage = None;
        self.seen_first_chunk = false;
        self.has_emitted_created = false;
        self.has_emitted_in_progress = false;
        self.text_item_added = false;
        self.text_item_closed = false;
        self.text_item_has_content = false;
        self.text_output_index = 0;
        self.current_output_index = 0;
        self.sequence_number = 0;
        self.terminated = false;
    }

    /// Whether the stream already ended with `response.completed` or
    /// `response.failed`.
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// The sequence number the next event will carry.
    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    /// Processes one chunk and returns the events it produces, in order.
    pub fn process_chunk(&mut self, chunk: &ChatStreamChunk) -> Vec<ResponsesStreamEvent> {
        if self.terminated {
            log::debug!("Ignoring chunk received after the stream ended");
            return Vec::new();
        }

        self.capture_metadata(chunk);

        let Some(choice) = chunk.choices.first() else {
            return Vec::new();
        };

        let delta = &choice.delta;
        let mut events = Vec::new();

        if delta.role.is_some() && !self.has_emitted_created {
            self.emit_lifecycle(&mut events);
        }

        let content = delta.content.as_deref().filter(|content| !content.is_empty());
        let reasoning = delta.reasoning.as_deref().filter(|reasoning| !reasoning.is_empty());
        let refusal = delta.refusal.as_deref().filter(|refusal| !refusal.is_empty());

        if let Some(content) = content {
            self.push_text_delta(content, &mut events);
        } else if reasoning.is_some() && !self.text_item_added && self.tool_call_output_indices.is_empty() {
            // Reasoning-only streams still open the text item, with one empty delta.
            self.push_text_delta("", &mut events);
        }

        let tool_calls = delta.tool_calls.as_deref().unwrap_or_default();

        if tool_calls.len() > 1 {
            log::debug!("Chunk carries {} tool call deltas, only the first is used", tool_calls.len());
        }

        let resolved = match tool_calls.first() {
            Some(tool_call) => self.push_tool_call(tool_call, &mut events),
            None => Ok(()),
        };

        if let Err(error) = resolved {
            log::debug!("Skipping rest of chunk: {error}");
            return events;
        }

        if let Some(reasoning) = reasoning {
            let output_index = self.text_output_index;

            self.push(
                &mut events,
                ResponsesStreamEventPayload::ReasoningSummaryTextDelta {
                    output_index,
                    delta: reasoning.to_string(),
                },
            );
        }

        if let Some(refusal) = refusal {
            let output_index = self.text_output_index;

            self.push(
                &mut events,
                ResponsesStreamEventPayload::RefusalDelta {
                    output_index,
                    refusal: refusal.to_string(),
                },
            );
        }

        if choice.finish_reason.is_some() {
            self.finish(&mut events);
        }

        events
    }

    /// Ends the stream with an `error` event followed by `response.failed`.
    ///
    /// Does nothing if the stream already ended.
    pub fn fail(&mut self, code: impl Into<String>, message: impl Into<String>) -> Vec<ResponsesStreamEvent> {
        self.fail_with(code.into(), message.into(), None)
    }

    /// Ends the stream with the given translation error.
    pub fn fail_with_error(&mut self, error: &MuxError) -> Vec<ResponsesStreamEvent> {
        self.fail_with(
            error.code().to_string(),
            error.to_string(),
            error.param().map(str::to_string),
        )
    }

    fn fail_with(&mut self, code: String, message: String, param: Option<String>) -> Vec<ResponsesStreamEvent> {
        if self.terminated {
            log::debug!("Ignoring failure reported after the stream ended: {message}");
            return Vec::new();
        }

        log::warn!("Stream failed with {code}: {message}");

        let mut events = Vec::new();

        self.push(
            &mut events,
            ResponsesStreamEventPayload::Error {
                code: code.clone(),
                message: message.clone(),
                param,
            },
        );

        let response = ResponsesResponse {
            status: Some(ResponsesStatus::Failed),
            error: Some(ResponsesError { code, message }),
            ..self.response()
        };

        self.push(&mut events, ResponsesStreamEventPayload::Failed { response });
        self.terminated = true;

        events
    }

    fn capture_metadata(&mut self, chunk: &ChatStreamChunk) {
        if !self.seen_first_chunk {
            self.seen_first_chunk = true;

            if chunk.created != 0 {
                self.created_at = chunk.created;
            }
        }

        if self.message_id.is_none() && !chunk.id.is_empty() {
            self.message_id = Some(chunk.id.clone());
        }

        if self.model.is_none() && !chunk.model.is_empty() {
            self.model = Some(chunk.model.clone());
        }

        if let Some(usage) = &chunk.usage {
            self.usage = Some(usage.clone());
        }
    }

    fn emit_lifecycle(&mut self, events: &mut Vec<ResponsesStreamEvent>) {
        let response = ResponsesResponse {
            status: Some(ResponsesStatus::InProgress),
            ..self.response()
        };

        self.push(
            events,
            ResponsesStreamEventPayload::Created {
                response: response.clone(),
            },
        );
        self.has_emitted_created = true;

        if !self.has_emitted_in_progress {
            self.push(events, ResponsesStreamEventPayload::InProgress { response });
            self.has_emitted_in_progress = true;
        }
    }

    fn push_text_delta(&mut self, text: &str, events: &mut Vec<ResponsesStreamEvent>) {
        if !self.text_item_added || self.text_item_closed {
            self.open_text_item(events);
        }

        let output_index = self.text_output_index;
        let item_id = self.item_ids.get(TEXT_ITEM_KEY).cloned();

        self.push(
            events,
            ResponsesStreamEventPayload::OutputTextDelta {
                output_index,
                content_index: TEXT_CONTENT_INDEX,
                item_id,
                delta: text.to_string(),
            },
        );

        if !text.is_empty() {
            self.text_item_has_content = true;
        }
    }

    fn open_text_item(&mut self, events: &mut Vec<ResponsesStreamEvent>) {
        let output_index = self.next_output_index();

        let item_id = match &self.message_id {
            Some(message_id) => format!("msg_{message_id}_item_{output_index}"),
            None => format!("item_{output_index}"),
        };

        self.item_ids.insert(TEXT_ITEM_KEY.to_string(), item_id.clone());
        self.text_output_index = output_index;
        self.text_item_added = true;
        self.text_item_closed = false;
        self.text_item_has_content = false;

        let item = ResponsesItem {
            id: Some(item_id.clone()),
            ..ResponsesItem::message(ResponsesRole::Assistant, Some(MessageContent::Blocks(Vec::new())))
        };

        self.push(
            events,
            ResponsesStreamEventPayload::OutputItemAdded {
                output_index,
                content_index: Some(TEXT_CONTENT_INDEX),
                item,
            },
        );

        self.push(
            events,
            ResponsesStreamEventPayload::ContentPartAdded {
                output_index,
                content_index: TEXT_CONTENT_INDEX,
                item_id,
                part: ResponsesContentBlock::output_text(""),
            },
        );
    }

    fn close_text_item(&mut self, events: &mut Vec<ResponsesStreamEvent>) {
        let output_index = self.text_output_index;
        let item_id = self.item_ids.get(TEXT_ITEM_KEY).cloned().unwrap_or_default();

        self.push(
            events,
            ResponsesStreamEventPayload::OutputTextDone {
                output_index,
                content_index: TEXT_CONTENT_INDEX,
                item_id: item_id.clone(),
                text: String::new(),
            },
        );

        self.push(
            events,
            ResponsesStreamEventPayload::ContentPartDone {
                output_index,
                content_index: TEXT_CONTENT_INDEX,
                item_id: item_id.clone(),
                part: None,
            },
        );

        let item = ResponsesItem {
            id: Some(item_id).filter(|id| !id.is_empty()),
            status: Some("completed".to_string()),
            ..ResponsesItem::of_type(ResponsesItemType::Message)
        };

        self.push(
            events,
            ResponsesStreamEventPayload::OutputItemDone {
                output_index,
                content_index: Some(TEXT_CONTENT_INDEX),
                item,
            },
        );

        self.text_item_closed = true;
    }

    fn push_tool_call(&mut self, tool_call: &ChatToolCall, events: &mut Vec<ResponsesStreamEvent>) -> MuxResult<()> {
        let index = tool_call.index.unwrap_or_default();
        let explicit_id = tool_call.id.as_deref().filter(|id| !id.is_empty());

        let tool_call_id = match explicit_id {
            Some(id) => id.to_string(),
            None => self
                .tool_call_index_to_id
                .get(&index)
                .cloned()
                .ok_or(MuxError::UnresolvedToolCallReference { index })?,
        };

        if explicit_id.is_some() && !self.tool_call_output_indices.contains_key(&tool_call_id) {
            self.open_tool_call(index, &tool_call_id, tool_call.function.name.as_deref(), events);
        }

        let arguments = &tool_call.function.arguments;

        if arguments.is_empty() {
            return Ok(());
        }

        self.tool_argument_buffers
            .entry(tool_call_id.clone())
            .or_default()
            .push_str(arguments);

        let output_index = self.tool_call_output_indices.get(&tool_call_id).copied().unwrap_or_default();
        let item_id = self.item_ids.get(&tool_call_id).cloned();

        self.push(
            events,
            ResponsesStreamEventPayload::FunctionCallArgumentsDelta {
                output_index,
                content_index: TOOL_CONTENT_INDEX,
                item_id,
                delta: arguments.clone(),
            },
        );

        Ok(())
    }

    fn open_tool_call(
        &mut self,
        index: u16,
        tool_call_id: &str,
        name: Option<&str>,
        events: &mut Vec<ResponsesStreamEvent>,
    ) {
        if self.text_item_added && !self.text_item_closed && self.text_item_has_content {
            self.close_text_item(events);
        }

        let output_index = self.next_output_index();

        self.tool_call_output_indices.insert(tool_call_id.to_string(), output_index);
        self.item_ids.insert(tool_call_id.to_string(), tool_call_id.to_string());
        self.tool_call_index_to_id.insert(index, tool_call_id.to_string());
        self.tool_argument_buffers.insert(tool_call_id.to_string(), String::new());

        if let Some(name) = name {
            self.tool_call_names.insert(tool_call_id.to_string(), name.to_string());
        }

        let item = ResponsesItem {
            id: Some(tool_call_id.to_string()),
            status: Some("in_progress".to_string()),
            call_id: Some(tool_call_id.to_string()),
            name: name.map(str::to_string),
            arguments: Some(String::new()),
            ..ResponsesItem::of_type(ResponsesItemType::FunctionCall)
        };

        self.push(
            events,
            ResponsesStreamEventPayload::OutputItemAdded {
                output_index,
                content_index: Some(TOOL_CONTENT_INDEX),
                item,
            },
        );
    }

    fn finish(&mut self, events: &mut Vec<ResponsesStreamEvent>) {
        if self.text_item_added && !self.text_item_closed {
            self.close_text_item(events);
        }

        let finished: Vec<(String, String)> = self
            .tool_argument_buffers
            .iter()
            .filter(|(_, arguments)| !arguments.is_empty())
            .map(|(id, arguments)| (id.clone(), arguments.clone()))
            .collect();

        for (tool_call_id, arguments) in finished {
            let output_index = self.tool_call_output_indices.get(&tool_call_id).copied().unwrap_or_default();
            let item_id = self.item_ids.get(&tool_call_id).cloned();

            self.push(
                events,
                ResponsesStreamEventPayload::FunctionCallArgumentsDone {
                    output_index,
                    content_index: TOOL_CONTENT_INDEX,
                    item_id: item_id.clone(),
                    arguments: arguments.clone(),
                },
            );

            let item = ResponsesItem {
                id: item_id,
                status: Some("completed".to_string()),
                call_id: Some(tool_call_id.clone()),
                name: self.tool_call_names.get(&tool_call_id).cloned(),
                arguments: Some(arguments),
                ..ResponsesItem::of_type(ResponsesItemType::FunctionCall)
            };

            self.push(
                events,
                ResponsesStreamEventPayload::OutputItemDone {
                    output_index,
                    content_index: Some(TOOL_CONTENT_INDEX),
                    item,
                },
            );
        }

        let response = ResponsesResponse {
            status: Some(ResponsesStatus::Completed),
            usage: self.usage.clone().map(Into::into),
            ..self.response()
        };

        self.push(events, ResponsesStreamEventPayload::Completed { response });
        self.terminated = true;
    }

    /// The identifying fields shared by every lifecycle event.
    fn response(&self) -> ResponsesResponse {
        ResponsesResponse {
            model: self.model.clone(),
            ..ResponsesResponse::new(self.message_id.clone(), self.created_at)
        }
    }

    fn next_output_index(&mut self) -> usize {
        let index = self.current_output_index;
        self.current_output_index += 1;

        index
    }

    fn push(&mut self, events: &mut Vec<ResponsesStreamEvent>, payload: ResponsesStreamEventPayload) {
        events.push(ResponsesStreamEvent {
            payload,
            sequence_number: self.sequence_number,
        });

        self.sequence_number += 1;
    }
}

fn unix_now() -> u64 {
    u64::try_from(jiff::Timestamp::now().as_second()).unwrap_or_default()
}
