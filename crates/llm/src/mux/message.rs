use serde_json::Value;

use super::content::{Side, to_chat_block, to_responses_block};
use crate::{
    error::MuxError,
    messages::{
        MessageContent,
        chat::{ChatMessage, ChatMessageContent, ChatRole, ChatToolCall, ChatToolCallFunction},
        responses::{
            ResponsesContentBlock, ResponsesContentBlockType, ResponsesItem, ResponsesItemType,
            ResponsesMessageContent, ResponsesRole,
        },
    },
};

impl ChatMessage {
    /// Converts this message into Responses items.
    ///
    /// An assistant message with tool calls expands into one `function_call`
    /// item per call and its own content is not emitted. Every other message
    /// becomes exactly one item. A message with an unknown role produces no
    /// items.
    ///
    /// Items have no equivalent of the participant `name` or of assistant
    /// `reasoning`, so both are dropped and do not survive a round trip.
    pub fn to_responses_items(self) -> Vec<ResponsesItem> {
        let ChatMessage {
            role,
            name,
            content,
            tool_calls,
            tool_call_id,
            refusal,
            reasoning,
            annotations,
        } = self;

        if name.as_deref().is_some_and(|name| !name.is_empty()) {
            log::debug!("Dropping message name: items have no participant name");
        }

        if reasoning.as_deref().is_some_and(|reasoning| !reasoning.is_empty()) {
            log::debug!("Dropping message reasoning: items have no reasoning field");
        }

        let role = match role {
            ChatRole::Assistant => {
                let tool_calls = tool_calls.unwrap_or_default();

                if !tool_calls.is_empty() {
                    return tool_calls.into_iter().map(function_call_item).collect();
                }

                ResponsesRole::Assistant
            }
            ChatRole::Tool => {
                let item = ResponsesItem {
                    call_id: tool_call_id,
                    output: content.map(input_content),
                    ..ResponsesItem::of_type(ResponsesItemType::FunctionCallOutput)
                };

                return vec![item];
            }
            ChatRole::User => ResponsesRole::User,
            ChatRole::System => ResponsesRole::System,
            ChatRole::Developer => ResponsesRole::Developer,
            ChatRole::Other(role) => {
                let error = MuxError::UnsupportedVariant {
                    kind: "chat role",
                    value: role,
                };

                log::warn!("Dropping message: {error}");
                return Vec::new();
            }
        };

        if role != ResponsesRole::Assistant {
            return vec![ResponsesItem::message(role, content.map(input_content))];
        }

        let content = content.filter(|content| !content.is_empty());

        match (content, refusal) {
            (None, Some(refusal)) => {
                let item = ResponsesItem {
                    role: Some(ResponsesRole::Assistant),
                    content: Some(MessageContent::Blocks(vec![ResponsesContentBlock::refusal(refusal)])),
                    ..ResponsesItem::of_type(ResponsesItemType::Refusal)
                };

                vec![item]
            }
            (content, refusal) => {
                let mut blocks = content.map(output_blocks).unwrap_or_default();

                let first_text = blocks
                    .iter_mut()
                    .find(|block| block.block_type == ResponsesContentBlockType::OutputText);

                if let Some(first_text) = first_text {
                    first_text.annotations = annotations;
                }

                if let Some(refusal) = refusal {
                    blocks.push(ResponsesContentBlock::refusal(refusal));
                }

                let content = if blocks.is_empty() {
                    None
                } else {
                    Some(MessageContent::Blocks(blocks))
                };

                vec![ResponsesItem::message(ResponsesRole::Assistant, content)]
            }
        }
    }
}

/// Aggregates Responses items back into chat messages.
///
/// Consecutive `function_call` items are buffered and emitted as one
/// assistant message once any other item, or the end of input, is reached.
/// Reasoning items are skipped without interrupting a run of calls. Items of
/// an unknown type, and messages without a known role, are dropped.
pub fn to_chat_messages(items: impl IntoIterator<Item = ResponsesItem>) -> Vec<ChatMessage> {
    let mut messages = Vec::new();
    let mut pending_calls = Vec::new();

    for mut item in items {
        let item_type = item.item_type.take().unwrap_or(ResponsesItemType::Message);

        match item_type {
            ResponsesItemType::FunctionCall => {
                pending_calls.push(tool_call(item));
                continue;
            }
            ResponsesItemType::Reasoning => continue,
            _ => flush_tool_calls(&mut pending_calls, &mut messages),
        }

        let message = match item_type {
            ResponsesItemType::FunctionCallOutput => {
                let content = item.output.or(item.content).map(chat_content);

                ChatMessage {
                    tool_call_id: item.call_id,
                    ..ChatMessage::new(ChatRole::Tool, content)
                }
            }
            ResponsesItemType::Refusal => {
                let refusal = item.content.and_then(|content| match content {
                    MessageContent::Text(text) => Some(text),
                    MessageContent::Blocks(blocks) => blocks
                        .into_iter()
                        .find(|block| block.block_type == ResponsesContentBlockType::Refusal)
                        .and_then(|block| block.refusal),
                });

                ChatMessage {
                    refusal,
                    ..ChatMessage::new(ChatRole::Assistant, None)
                }
            }
            ResponsesItemType::Message => match message_from_item(item) {
                Some(message) => message,
                None => continue,
            },
            ResponsesItemType::Other(other) => {
                let error = MuxError::UnsupportedVariant {
                    kind: "item type",
                    value: other,
                };

                log::warn!("Dropping item: {error}");
                continue;
            }
            ResponsesItemType::FunctionCall | ResponsesItemType::Reasoning => continue,
        };

        messages.push(message);
    }

    flush_tool_calls(&mut pending_calls, &mut messages);

    messages
}

fn flush_tool_calls(pending: &mut Vec<ChatToolCall>, messages: &mut Vec<ChatMessage>) {
    if pending.is_empty() {
        return;
    }

    messages.push(ChatMessage::with_tool_calls(std::mem::take(pending)));
}

fn function_call_item(call: ChatToolCall) -> ResponsesItem {
    ResponsesItem {
        call_id: call.id.filter(|id| !id.is_empty()),
        name: call.function.name.filter(|name| !name.is_empty()),
        arguments: Some(call.function.arguments).filter(|arguments| !arguments.is_empty()),
        ..ResponsesItem::of_type(ResponsesItemType::FunctionCall)
    }
}

fn tool_call(item: ResponsesItem) -> ChatToolCall {
    ChatToolCall {
        index: None,
        call_type: Some("function".to_string()),
        id: item.call_id,
        function: ChatToolCallFunction {
            name: item.name,
            arguments: item.arguments.unwrap_or_default(),
        },
    }
}

fn message_from_item(item: ResponsesItem) -> Option<ChatMessage> {
    let role = match item.role {
        Some(ResponsesRole::Assistant) => ChatRole::Assistant,
        Some(ResponsesRole::User) => ChatRole::User,
        Some(ResponsesRole::System) => ChatRole::System,
        Some(ResponsesRole::Developer) => ChatRole::Developer,
        Some(ResponsesRole::Other(role)) => {
            let error = MuxError::UnsupportedVariant {
                kind: "item role",
                value: role,
            };

            log::warn!("Dropping message item: {error}");
            return None;
        }
        None => {
            log::warn!("Dropping message item without a role");
            return None;
        }
    };

    if role != ChatRole::Assistant {
        return Some(ChatMessage::new(role, item.content.map(chat_content)));
    }

    let mut refusal = None;
    let mut annotations: Vec<Value> = Vec::new();

    let content = item.content.map(|content| match content {
        MessageContent::Text(text) => MessageContent::Text(text),
        MessageContent::Blocks(blocks) => {
            let mut kept = Vec::with_capacity(blocks.len());

            for mut block in blocks {
                match block.block_type {
                    ResponsesContentBlockType::Refusal if refusal.is_none() => refusal = block.refusal.take(),
                    _ => {
                        annotations.extend(block.annotations.take().unwrap_or_default());
                        kept.push(block);
                    }
                }
            }

            MessageContent::Blocks(kept)
        }
    });

    let content = content
        .filter(|content| !matches!(content, MessageContent::Blocks(blocks) if blocks.is_empty()))
        .map(chat_content);

    Some(ChatMessage {
        refusal,
        annotations: (!annotations.is_empty()).then_some(annotations),
        ..ChatMessage::new(role, content)
    })
}

/// Content of a non-assistant message: strings stay strings.
fn input_content(content: ChatMessageContent) -> ResponsesMessageContent {
    content.map_blocks(|block| to_responses_block(block, Side::Input))
}

/// Assistant content is always a block list on the Responses side.
fn output_blocks(content: ChatMessageContent) -> Vec<ResponsesContentBlock> {
    match content {
        MessageContent::Text(text) => vec![ResponsesContentBlock::output_text(text)],
        MessageContent::Blocks(blocks) => blocks
            .into_iter()
            .map(|block| to_responses_block(block, Side::Output))
            .collect(),
    }
}

/// A lone `output_text` block collapses back into string content.
fn chat_content(content: ResponsesMessageContent) -> ChatMessageContent {
    match content {
        MessageContent::Blocks(mut blocks)
            if blocks.len() == 1 && blocks[0].block_type == ResponsesContentBlockType::OutputText =>
        {
            let text = blocks.pop().and_then(|block| block.text).unwrap_or_default();
            MessageContent::Text(text)
        }
        content => content.map_blocks(to_chat_block),
    }
}
