use serde::{Deserialize, Serialize};

use crate::messages::responses::{ResponsesContentBlock, ResponsesItem, ResponsesResponse};

/// One event of a Responses stream.
///
/// Serialises as a flat object: the payload's `type` and fields, followed by
/// `sequence_number`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponsesStreamEvent {
    #[serde(flatten)]
    pub payload: ResponsesStreamEventPayload,
    pub sequence_number: u64,
}

impl ResponsesStreamEvent {
    /// The wire name of the event, e.g. `response.output_text.delta`.
    pub fn event_type(&self) -> &'static str {
        self.payload.event_type()
    }
}

/// Streaming event types for Responses SSE output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ResponsesStreamEventPayload {
    /// First event of every stream.
    #[serde(rename = "response.created")]
    Created { response: ResponsesResponse },

    #[serde(rename = "response.in_progress")]
    InProgress { response: ResponsesResponse },

    /// Terminal event of a successful stream, carrying the final usage.
    #[serde(rename = "response.completed")]
    Completed { response: ResponsesResponse },

    /// Terminal event of a stream that could not be finished.
    #[serde(rename = "response.failed")]
    Failed { response: ResponsesResponse },

    /// A new output item (text message or function call) was opened.
    #[serde(rename = "response.output_item.added")]
    OutputItemAdded {
        output_index: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content_index: Option<usize>,
        item: ResponsesItem,
    },

    #[serde(rename = "response.output_item.done")]
    OutputItemDone {
        output_index: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content_index: Option<usize>,
        item: ResponsesItem,
    },

    #[serde(rename = "response.content_part.added")]
    ContentPartAdded {
        output_index: usize,
        content_index: usize,
        item_id: String,
        part: ResponsesContentBlock,
    },

    #[serde(rename = "response.content_part.done")]
    ContentPartDone {
        output_index: usize,
        content_index: usize,
        item_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        part: Option<ResponsesContentBlock>,
    },

    #[serde(rename = "response.output_text.delta")]
    OutputTextDelta {
        output_index: usize,
        content_index: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        item_id: Option<String>,
        delta: String,
    },

    #[serde(rename = "response.output_text.done")]
    OutputTextDone {
        output_index: usize,
        content_index: usize,
        item_id: String,
        text: String,
    },

    #[serde(rename = "response.function_call_arguments.delta")]
    FunctionCallArgumentsDelta {
        output_index: usize,
        content_index: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        item_id: Option<String>,
        delta: String,
    },

    /// Carries the complete, buffered argument string of one call.
    #[serde(rename = "response.function_call_arguments.done")]
    FunctionCallArgumentsDone {
        output_index: usize,
        content_index: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        item_id: Option<String>,
        arguments: String,
    },

    #[serde(rename = "response.reasoning_summary_text.delta")]
    ReasoningSummaryTextDelta { output_index: usize, delta: String },

    #[serde(rename = "response.refusal.delta")]
    RefusalDelta { output_index: usize, refusal: String },

    /// Emitted right before `response.failed`.
    #[serde(rename = "error")]
    Error {
        code: String,
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        param: Option<String>,
    },
}

impl ResponsesStreamEventPayload {
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Created { .. } => "response.created",
            Self::InProgress { .. } => "response.in_progress",
            Self::Completed { .. } => "response.completed",
            Self::Failed { .. } => "response.failed",
            Self::OutputItemAdded { .. } => "response.output_item.added",
            Self::OutputItemDone { .. } => "response.output_item.done",
            Self::ContentPartAdded { .. } => "response.content_part.added",
            Self::ContentPartDone { .. } => "response.content_part.done",
            Self::OutputTextDelta { .. } => "response.output_text.delta",
            Self::OutputTextDone { .. } => "response.output_text.done",
            Self::FunctionCallArgumentsDelta { .. } => "response.function_call_arguments.delta",
            Self::FunctionCallArgumentsDone { .. } => "response.function_call_arguments.done",
            Self::ReasoningSummaryTextDelta { .. } => "response.reasoning_summary_text.delta",
            Self::RefusalDelta { .. } => "response.refusal.delta",
            Self::Error { .. } => "error",
        }
    }

    /// Whether the event ends the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed { .. } | Self::Failed { .. })
    }
}
