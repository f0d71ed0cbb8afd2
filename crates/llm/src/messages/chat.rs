//! Chat Completions request, response and streaming types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Cost, ExtraFields, MessageContent};

pub type ChatMessageContent = MessageContent<ChatContentBlock>;

/// A Chat Completions request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
    /// Sampling, tool and output parameters, flattened into the body.
    #[serde(flatten)]
    pub params: ChatParameters,
}

/// Optional parameters of a Chat Completions request.
///
/// `reasoning_effort` and `reasoning_max_tokens` are the legacy flat forms of
/// the nested `reasoning` object. Both forms are accepted on input; they are
/// merged when translating to the Responses shape.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logit_bias: Option<serde_json::Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logprobs: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_completion_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modalities: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallel_tool_calls: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_cache_key: Option<String>,
    /// "minimal" | "low" | "medium" | "high"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_effort: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<ChatReasoning>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_format: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_tier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_options: Option<ChatStreamOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_logprobs: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ChatToolChoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ChatTool>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// "low" | "medium" | "high"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbosity: Option<String>,
    /// Provider-specific keys, forwarded verbatim.
    #[serde(flatten)]
    pub extra_params: ExtraFields,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReasoning {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effort: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatStreamOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_obfuscation: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_usage: Option<bool>,
}

/// The author of a chat message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    System,
    User,
    Assistant,
    Tool,
    Developer,
    /// Any role this gateway does not know. Kept so it can be reported.
    #[serde(untagged)]
    Other(String),
}

impl ChatRole {
    pub fn as_str(&self) -> &str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Tool => "tool",
            Self::Developer => "developer",
            Self::Other(role) => role,
        }
    }
}

/// One turn of a chat conversation.
///
/// `tool_call_id` is only meaningful on tool messages; `tool_calls`,
/// `refusal`, `reasoning` and `annotations` only on assistant messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub content: Option<ChatMessageContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ChatToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refusal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Vec<Value>>,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: Option<ChatMessageContent>) -> Self {
        Self {
            role,
            name: None,
            content,
            tool_calls: None,
            tool_call_id: None,
            refusal: None,
            reasoning: None,
            annotations: None,
        }
    }

    /// A message with plain string content.
    pub fn text(role: ChatRole, text: impl Into<String>) -> Self {
        Self::new(role, Some(MessageContent::Text(text.into())))
    }

    /// An assistant message carrying only tool calls.
    pub fn with_tool_calls(tool_calls: Vec<ChatToolCall>) -> Self {
        Self {
            tool_calls: Some(tool_calls),
            ..Self::new(ChatRole::Assistant, None)
        }
    }

    /// A tool message answering the call `tool_call_id`.
    pub fn tool_result(tool_call_id: impl Into<String>, content: Option<ChatMessageContent>) -> Self {
        Self {
            tool_call_id: Some(tool_call_id.into()),
            ..Self::new(ChatRole::Tool, content)
        }
    }

    /// A refusal from the assistant.
    pub fn refusal(refusal: impl Into<String>) -> Self {
        Self {
            refusal: Some(refusal.into()),
            ..Self::new(ChatRole::Assistant, None)
        }
    }
}

/// Discriminator of a [`ChatContentBlock`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatContentBlockType {
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "image_url")]
    ImageUrl,
    #[serde(rename = "input_audio")]
    InputAudio,
    #[serde(rename = "input_file", alias = "file")]
    InputFile,
    #[serde(rename = "refusal")]
    Refusal,
    /// Any block type not yet known. Passed through untouched.
    #[serde(untagged)]
    Other(String),
}

/// A typed piece of chat message content.
///
/// Only the field matching `type` is populated; the rest stay absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatContentBlock {
    #[serde(rename = "type")]
    pub block_type: ChatContentBlockType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refusal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<ChatImageUrl>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_audio: Option<ChatInputAudio>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<ChatInputFile>,
}

impl ChatContentBlock {
    pub fn new(block_type: ChatContentBlockType) -> Self {
        Self {
            block_type,
            text: None,
            refusal: None,
            image_url: None,
            input_audio: None,
            file: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new(ChatContentBlockType::Text)
        }
    }

    pub fn image_url(url: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            image_url: Some(ChatImageUrl {
                url: url.into(),
                detail,
            }),
            ..Self::new(ChatContentBlockType::ImageUrl)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatImageUrl {
    pub url: String,
    /// "low" | "high" | "auto"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatInputAudio {
    /// Base64 encoded audio.
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatInputFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

/// A tool call requested by the assistant.
///
/// In streams the same call arrives over several chunks: the first one
/// carries `id` and usually `function.name`, later ones only `index` and an
/// argument fragment.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatToolCall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u16>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub call_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub function: ChatToolCallFunction,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatToolCallFunction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Raw JSON text. Not guaranteed to parse until the call is complete.
    #[serde(default)]
    pub arguments: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatToolType {
    Function,
    Custom,
    #[serde(untagged)]
    Other(String),
}

/// A tool the model may call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTool {
    #[serde(rename = "type")]
    pub tool_type: ChatToolType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<ChatToolFunction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<ChatToolCustom>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatToolFunction {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON schema of the arguments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
}

/// A free-form tool whose input may be constrained by a grammar.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatToolCustom {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<ChatToolCustomFormat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatToolCustomFormat {
    /// "text" or "grammar"
    #[serde(rename = "type")]
    pub format_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grammar: Option<ChatToolGrammar>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatToolGrammar {
    pub definition: String,
    pub syntax: GrammarSyntax,
}

/// Grammar language of a custom tool's input format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrammarSyntax {
    Lark,
    Regex,
    #[serde(untagged)]
    Other(String),
}

/// Controls which tool, if any, the model calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatToolChoice {
    /// "none" | "auto" | "required"
    Mode(String),
    Struct(ChatToolChoiceStruct),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatToolChoiceType {
    None,
    Any,
    Required,
    Function,
    Custom,
    AllowedTools,
    #[serde(untagged)]
    Other(String),
}

impl ChatToolChoiceType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::None => "none",
            Self::Any => "any",
            Self::Required => "required",
            Self::Function => "function",
            Self::Custom => "custom",
            Self::AllowedTools => "allowed_tools",
            Self::Other(other) => other,
        }
    }
}

impl From<&str> for ChatToolChoiceType {
    fn from(value: &str) -> Self {
        match value {
            "none" => Self::None,
            "any" => Self::Any,
            "required" => Self::Required,
            "function" => Self::Function,
            "custom" => Self::Custom,
            "allowed_tools" => Self::AllowedTools,
            other => Self::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatToolChoiceStruct {
    #[serde(rename = "type")]
    pub choice_type: ChatToolChoiceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<ChatToolChoiceName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<ChatToolChoiceName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_tools: Option<ChatAllowedTools>,
}

impl ChatToolChoiceStruct {
    pub fn new(choice_type: ChatToolChoiceType) -> Self {
        Self {
            choice_type,
            function: None,
            custom: None,
            allowed_tools: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatToolChoiceName {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatAllowedTools {
    /// "auto" | "required"
    pub mode: String,
    pub tools: Vec<ChatAllowedTool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatAllowedTool {
    #[serde(rename = "type")]
    pub tool_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<ChatToolChoiceName>,
}

/// Why the model stopped generating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatFinishReason {
    Stop,
    Length,
    ToolCalls,
    ContentFilter,
    FunctionCall,
    #[serde(untagged)]
    Other(String),
}

/// A completed (non-streaming) Chat Completions response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub id: String,
    #[serde(default = "chat_completion_object")]
    pub object: String,
    pub created: u64,
    pub model: String,
    pub choices: Vec<ChatChoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<LlmUsage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_fingerprint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_tier: Option<String>,
}

pub(crate) fn chat_completion_object() -> String {
    "chat.completion".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatChoice {
    pub index: usize,
    pub message: ChatMessage,
    #[serde(default)]
    pub finish_reason: Option<ChatFinishReason>,
}

/// One chunk of a streamed Chat Completions response.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatStreamChunk {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub object: String,
    /// Unix seconds.
    #[serde(default)]
    pub created: u64,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub choices: Vec<ChatStreamChoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<LlmUsage>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatStreamChoice {
    #[serde(default)]
    pub index: usize,
    #[serde(default)]
    pub delta: ChatStreamDelta,
    #[serde(default)]
    pub finish_reason: Option<ChatFinishReason>,
}

/// The incremental part of a stream chunk.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatStreamDelta {
    /// Only present on the first chunk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<ChatRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, alias = "thought", skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refusal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ChatToolCall>>,
}

/// Token accounting in the chat shape.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmUsage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_tokens_details: Option<ChatPromptTokensDetails>,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_tokens_details: Option<ChatCompletionTokensDetails>,
    #[serde(default)]
    pub total_tokens: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<Cost>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatPromptTokensDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_tokens: Option<u64>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionTokensDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepted_prediction_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejected_prediction_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citation_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_search_queries: Option<u64>,
    /// Sent by a few providers even though the OpenAI schema lacks it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_tokens: Option<u64>,
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use serde_json::json;

    use super::*;

    #[test]
    fn unknown_role_is_preserved() {
        let message: ChatMessage = serde_json::from_value(json!({ "role": "critic", "content": "meh" })).unwrap();

        assert_eq!(message.role, ChatRole::Other("critic".to_string()));
        assert_eq!(serde_json::to_value(&message).unwrap()["role"], "critic");
    }

    #[test]
    fn unknown_parameters_are_kept() {
        let request: ChatRequest = serde_json::from_str(indoc! {r#"
            {
              "model": "gpt-4o",
              "messages": [{ "role": "user", "content": "hi" }],
              "temperature": 0.2,
              "top_k": 40
            }
        "#})
        .unwrap();

        assert_eq!(request.params.temperature, Some(0.2));
        assert_eq!(request.params.extra_params.get("top_k"), Some(&json!(40)));

        insta::assert_json_snapshot!(request, @r#"
        {
          "model": "gpt-4o",
          "messages": [
            {
              "role": "user",
              "content": "hi"
            }
          ],
          "temperature": 0.2,
          "top_k": 40
        }
        "#);
    }

    #[test]
    fn file_block_alias() {
        let block: ChatContentBlock = serde_json::from_value(json!({
            "type": "file",
            "file": { "file_id": "file-1" }
        }))
        .unwrap();

        assert_eq!(block.block_type, ChatContentBlockType::InputFile);
        assert_eq!(
            serde_json::to_value(&block).unwrap(),
            json!({ "type": "input_file", "file": { "file_id": "file-1" } })
        );
    }

    #[test]
    fn tool_choice_string_or_struct() {
        let mode: ChatToolChoice = serde_json::from_value(json!("auto")).unwrap();
        assert_eq!(mode, ChatToolChoice::Mode("auto".to_string()));

        let specific: ChatToolChoice =
            serde_json::from_value(json!({ "type": "function", "function": { "name": "lookup" } })).unwrap();

        let ChatToolChoice::Struct(choice) = &specific else {
            unreachable!("expected a structured choice, got {specific:?}");
        };

        assert_eq!(choice.choice_type, ChatToolChoiceType::Function);
        assert_eq!(choice.function.as_ref().map(|f| f.name.as_str()), Some("lookup"));
    }

    #[test]
    fn thought_is_an_alias_for_reasoning() {
        let chunk: ChatStreamChunk = serde_json::from_value(json!({
            "id": "c1",
            "choices": [{ "index": 0, "delta": { "thought": "hmm" } }]
        }))
        .unwrap();

        assert_eq!(chunk.choices[0].delta.reasoning.as_deref(), Some("hmm"));
    }

    #[test]
    fn finish_reason_forward_compatible() {
        let choice: ChatStreamChoice = serde_json::from_value(json!({ "finish_reason": "pause" })).unwrap();
        assert_eq!(choice.finish_reason, Some(ChatFinishReason::Other("pause".to_string())));
    }
}
