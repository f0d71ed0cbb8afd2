//! Tool definitions and tool choice in both directions.

use crate::messages::{
    chat::{
        ChatAllowedTool, ChatAllowedTools, ChatTool, ChatToolChoice, ChatToolChoiceName, ChatToolChoiceStruct,
        ChatToolChoiceType, ChatToolCustom, ChatToolCustomFormat, ChatToolFunction, ChatToolGrammar, ChatToolType,
    },
    responses::{
        ResponsesAllowedTool, ResponsesTool, ResponsesToolChoice, ResponsesToolChoiceStruct, ResponsesToolCustomFormat,
    },
};

impl From<ChatTool> for ResponsesTool {
    fn from(tool: ChatTool) -> Self {
        let tool_type = match tool.tool_type {
            ChatToolType::Function => "function".to_string(),
            ChatToolType::Custom => "custom".to_string(),
            ChatToolType::Other(other) => other,
        };

        let mut converted = ResponsesTool::new(tool_type);

        if let Some(function) = tool.function {
            converted.name = Some(function.name);
            converted.description = function.description;
            converted.parameters = function.parameters;
            converted.strict = function.strict;
        }

        if let Some(custom) = tool.custom {
            converted.name = converted.name.or(custom.name);
            converted.description = converted.description.or(custom.description);

            // Grammar fields travel together.
            converted.format = custom.format.map(|format| {
                let (definition, syntax) = match format.grammar {
                    Some(grammar) => (Some(grammar.definition), Some(grammar.syntax)),
                    None => (None, None),
                };

                ResponsesToolCustomFormat {
                    format_type: format.format_type,
                    definition,
                    syntax,
                }
            });
        }

        converted
    }
}

impl From<ResponsesTool> for ChatTool {
    fn from(tool: ResponsesTool) -> Self {
        match tool.tool_type.as_str() {
            "function" => ChatTool {
                tool_type: ChatToolType::Function,
                function: tool.name.map(|name| ChatToolFunction {
                    name,
                    description: tool.description,
                    parameters: tool.parameters,
                    strict: tool.strict,
                }),
                custom: None,
            },
            "custom" => {
                let format = tool.format.map(|format| {
                    let grammar = match (format.definition, format.syntax) {
                        (Some(definition), Some(syntax)) => Some(ChatToolGrammar { definition, syntax }),
                        _ => None,
                    };

                    ChatToolCustomFormat {
                        format_type: format.format_type,
                        grammar,
                    }
                });

                ChatTool {
                    tool_type: ChatToolType::Custom,
                    function: None,
                    custom: Some(ChatToolCustom {
                        name: tool.name,
                        description: tool.description,
                        format,
                    }),
                }
            }
            _ => {
                log::debug!("Passing hosted tool '{}' through untranslated", tool.tool_type);

                ChatTool {
                    tool_type: ChatToolType::Other(tool.tool_type),
                    function: None,
                    custom: None,
                }
            }
        }
    }
}

impl From<ChatToolChoice> for ResponsesToolChoice {
    fn from(choice: ChatToolChoice) -> Self {
        let choice = match choice {
            ChatToolChoice::Mode(mode) => return ResponsesToolChoice::Mode(mode),
            ChatToolChoice::Struct(choice) => choice,
        };

        let mut converted = ResponsesToolChoiceStruct {
            choice_type: choice.choice_type.as_str().to_string(),
            mode: None,
            name: None,
            tools: None,
        };

        match choice.choice_type {
            ChatToolChoiceType::None | ChatToolChoiceType::Any | ChatToolChoiceType::Required => {
                converted.mode = Some(choice.choice_type.as_str().to_string());
            }
            ChatToolChoiceType::Function => {
                converted.name = choice.function.map(|f| f.name).filter(|name| !name.is_empty());
            }
            ChatToolChoiceType::Custom => {
                converted.name = choice.custom.map(|c| c.name).filter(|name| !name.is_empty());
            }
            ChatToolChoiceType::AllowedTools => {
                if let Some(allowed) = choice.allowed_tools {
                    if !allowed.tools.is_empty() {
                        let tools = allowed
                            .tools
                            .into_iter()
                            .map(|tool| ResponsesAllowedTool {
                                tool_type: tool.tool_type,
                                name: tool.function.map(|f| f.name).filter(|name| !name.is_empty()),
                            })
                            .collect();

                        converted.tools = Some(tools);
                    }

                    converted.mode = Some(allowed.mode).filter(|mode| !mode.is_empty());
                }
            }
            ChatToolChoiceType::Other(_) => {}
        }

        ResponsesToolChoice::Struct(converted)
    }
}

impl From<ResponsesToolChoice> for ChatToolChoice {
    fn from(choice: ResponsesToolChoice) -> Self {
        let choice = match choice {
            ResponsesToolChoice::Mode(mode) => return ChatToolChoice::Mode(mode),
            ResponsesToolChoice::Struct(choice) => choice,
        };

        let mut converted = ChatToolChoiceStruct::new(ChatToolChoiceType::from(choice.choice_type.as_str()));

        match choice.mode.as_deref() {
            Some("none") => converted.choice_type = ChatToolChoiceType::None,
            Some("auto") => converted.choice_type = ChatToolChoiceType::Any,
            Some("required") => converted.choice_type = ChatToolChoiceType::Required,
            _ => {}
        }

        match choice.choice_type.as_str() {
            "function" => converted.function = choice.name.map(|name| ChatToolChoiceName { name }),
            "custom" => converted.custom = choice.name.map(|name| ChatToolChoiceName { name }),
            _ => {}
        }

        let tools = choice.tools.unwrap_or_default();

        if !tools.is_empty() {
            let tools = tools
                .into_iter()
                .map(|tool| ChatAllowedTool {
                    tool_type: tool.tool_type,
                    function: tool.name.map(|name| ChatToolChoiceName { name }),
                })
                .collect();

            converted.choice_type = ChatToolChoiceType::AllowedTools;
            converted.allowed_tools = Some(ChatAllowedTools {
                mode: choice
                    .mode
                    .filter(|mode| !mode.is_empty())
                    .unwrap_or_else(|| "auto".to_string()),
                tools,
            });
        }

        ChatToolChoice::Struct(converted)
    }
}
