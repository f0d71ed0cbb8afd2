use thiserror::Error;

pub type MuxResult<T> = std::result::Result<T, MuxError>;

/// Errors raised while translating between the Chat and Responses shapes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MuxError {
    /// Content carried both a string and a block list, or neither parsed.
    #[error("Malformed content: {0}")]
    MalformedContent(String),

    /// The same value was given through two parameter forms that disagree.
    #[error("Conflicting values for '{parameter}': '{flat}' and '{nested}'")]
    ConflictingParameter {
        parameter: &'static str,
        flat: String,
        nested: String,
    },

    /// A streamed tool-call delta carried neither an id nor a known index.
    #[error("Tool call delta at index {index} does not reference a known tool call")]
    UnresolvedToolCallReference { index: u16 },

    /// A discriminator value neither direction knows how to translate.
    #[error("Unsupported {kind} '{value}'")]
    UnsupportedVariant { kind: &'static str, value: String },
}

impl MuxError {
    /// Stable machine-readable code, used in stream `error` events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedContent(_) => "malformed_content",
            Self::ConflictingParameter { .. } => "conflicting_parameter",
            Self::UnresolvedToolCallReference { .. } => "unresolved_tool_call_reference",
            Self::UnsupportedVariant { .. } => "unsupported_variant",
        }
    }

    /// The request parameter the error points at, if any.
    pub fn param(&self) -> Option<&'static str> {
        match self {
            Self::ConflictingParameter { parameter, .. } => Some(*parameter),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MuxError;

    #[test]
    fn conflicting_parameter_message() {
        let error = MuxError::ConflictingParameter {
            parameter: "reasoning.effort",
            flat: "low".to_string(),
            nested: "high".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "Conflicting values for 'reasoning.effort': 'low' and 'high'"
        );
        assert_eq!(error.code(), "conflicting_parameter");
        assert_eq!(error.param(), Some("reasoning.effort"));
    }

    #[test]
    fn unsupported_variant_has_no_param() {
        let error = MuxError::UnsupportedVariant {
            kind: "item type",
            value: "computer_call".to_string(),
        };

        assert_eq!(error.to_string(), "Unsupported item type 'computer_call'");
        assert_eq!(error.param(), None);
    }
}
