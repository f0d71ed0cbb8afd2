use serde::{Deserialize, Deserializer, Serialize, Serializer, de::DeserializeOwned};
use serde_json::Value;

use crate::error::{MuxError, MuxResult};

/// Message content: either plain text or an ordered list of typed blocks.
///
/// Exactly one form exists per value, so the both-set case can only be
/// produced through [`MessageContent::from_parts`], which rejects it. "No
/// content" is modelled by the owner as `Option::None` and serialises as
/// `null`.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageContent<B> {
    Text(String),
    Blocks(Vec<B>),
}

impl<B> MessageContent<B> {
    /// Builds content from two independently optional forms.
    pub fn from_parts(text: Option<String>, blocks: Option<Vec<B>>) -> MuxResult<Option<Self>> {
        match (text, blocks) {
            (Some(_), Some(_)) => Err(MuxError::MalformedContent(
                "both a string and content blocks are set".to_string(),
            )),
            (Some(text), None) => Ok(Some(Self::Text(text))),
            (None, Some(blocks)) => Ok(Some(Self::Blocks(blocks))),
            (None, None) => Ok(None),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Blocks(_) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::Blocks(blocks) => blocks.is_empty(),
        }
    }

    /// Maps every block, keeping plain text as is.
    pub fn map_blocks<T>(self, f: impl FnMut(B) -> T) -> MessageContent<T> {
        match self {
            Self::Text(text) => MessageContent::Text(text),
            Self::Blocks(blocks) => MessageContent::Blocks(blocks.into_iter().map(f).collect()),
        }
    }
}

impl<B: DeserializeOwned> TryFrom<Value> for MessageContent<B> {
    type Error = MuxError;

    fn try_from(value: Value) -> MuxResult<Self> {
        match value {
            Value::String(text) => Ok(Self::Text(text)),
            Value::Array(_) => serde_json::from_value(value)
                .map(Self::Blocks)
                .map_err(|e| MuxError::MalformedContent(format!("invalid content blocks: {e}"))),
            other => Err(MuxError::MalformedContent(format!(
                "expected a string or a list of content blocks, got {}",
                json_kind(&other)
            ))),
        }
    }
}

impl<B: Serialize> Serialize for MessageContent<B> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Text(text) => serializer.serialize_str(text),
            Self::Blocks(blocks) => blocks.serialize(serializer),
        }
    }
}

impl<'de, B: DeserializeOwned> Deserialize<'de> for MessageContent<B> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::try_from(value).map_err(serde::de::Error::custom)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
