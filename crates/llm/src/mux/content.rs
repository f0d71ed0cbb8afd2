//! Content block rename table.
//!
//! | chat          | responses                                     |
//! |---------------|-----------------------------------------------|
//! | `text`        | `input_text`, or `output_text` for assistants |
//! | `image_url`   | `input_image`                                 |
//! | `input_file`  | `input_file`                                  |
//! | `input_audio` | `input_audio`                                 |
//! | `refusal`     | `refusal`                                     |
//!
//! Both `input_text` and `output_text` come back as `text`. Unknown types
//! pass through under their original name in both directions.

use crate::messages::{
    chat::{ChatContentBlock, ChatContentBlockType, ChatImageUrl, ChatInputAudio, ChatInputFile},
    responses::{ResponsesContentBlock, ResponsesContentBlockType, ResponsesInputAudio},
};

/// Which side of the conversation a block belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Side {
    Input,
    Output,
}

fn responses_block_type(block_type: ChatContentBlockType, side: Side) -> ResponsesContentBlockType {
    match block_type {
        ChatContentBlockType::Text => match side {
            Side::Input => ResponsesContentBlockType::InputText,
            Side::Output => ResponsesContentBlockType::OutputText,
        },
        ChatContentBlockType::ImageUrl => ResponsesContentBlockType::InputImage,
        ChatContentBlockType::InputFile => ResponsesContentBlockType::InputFile,
        ChatContentBlockType::InputAudio => ResponsesContentBlockType::InputAudio,
        ChatContentBlockType::Refusal => ResponsesContentBlockType::Refusal,
        ChatContentBlockType::Other(other) => ResponsesContentBlockType::Other(other),
    }
}

fn chat_block_type(block_type: ResponsesContentBlockType) -> ChatContentBlockType {
    match block_type {
        ResponsesContentBlockType::InputText | ResponsesContentBlockType::OutputText => ChatContentBlockType::Text,
        ResponsesContentBlockType::InputImage => ChatContentBlockType::ImageUrl,
        ResponsesContentBlockType::InputFile => ChatContentBlockType::InputFile,
        ResponsesContentBlockType::InputAudio => ChatContentBlockType::InputAudio,
        ResponsesContentBlockType::Refusal => ChatContentBlockType::Refusal,
        ResponsesContentBlockType::ReasoningText => ChatContentBlockType::Other("reasoning_text".to_string()),
        ResponsesContentBlockType::Other(other) => ChatContentBlockType::Other(other),
    }
}

pub(super) fn to_responses_block(block: ChatContentBlock, side: Side) -> ResponsesContentBlock {
    let ChatContentBlock {
        block_type,
        text,
        refusal,
        image_url,
        input_audio,
        file,
    } = block;

    let (image_url, detail) = match image_url {
        Some(ChatImageUrl { url, detail }) => (Some(url), detail),
        None => (None, None),
    };

    let file = file.unwrap_or_default();

    ResponsesContentBlock {
        text,
        refusal,
        image_url,
        detail,
        file_id: file.file_id,
        file_data: file.file_data,
        filename: file.filename,
        input_audio: input_audio.map(|audio| ResponsesInputAudio {
            data: audio.data,
            format: audio.format,
        }),
        ..ResponsesContentBlock::new(responses_block_type(block_type, side))
    }
}

pub(super) fn to_chat_block(block: ResponsesContentBlock) -> ChatContentBlock {
    let ResponsesContentBlock {
        block_type,
        text,
        refusal,
        image_url,
        detail,
        file_id,
        file_data,
        filename,
        input_audio,
        annotations: _,
    } = block;

    let file = if file_id.is_some() || file_data.is_some() || filename.is_some() {
        Some(ChatInputFile {
            file_data,
            file_id,
            filename,
        })
    } else {
        None
    };

    ChatContentBlock {
        text,
        refusal,
        image_url: image_url.map(|url| ChatImageUrl { url, detail }),
        input_audio: input_audio.map(|audio| ChatInputAudio {
            data: audio.data,
            format: audio.format,
        }),
        file,
        ..ChatContentBlock::new(chat_block_type(block_type))
    }
}
