use std::fmt::Display;

use crate::{
    error::{MuxError, MuxResult},
    messages::{
        chat::{ChatMessage, ChatParameters, ChatReasoning, ChatRequest, ChatRole, ChatStreamOptions},
        responses::{
            ResponsesInput, ResponsesParameters, ResponsesReasoning, ResponsesRequest, ResponsesStreamOptions,
            ResponsesTextConfig,
        },
    },
};

use super::to_chat_messages;

impl ChatRequest {
    /// Translates the request into the Responses shape.
    ///
    /// Fails when a reasoning setting is given both through the legacy flat
    /// field and the nested `reasoning` object with different values.
    pub fn to_responses_request(self) -> MuxResult<ResponsesRequest> {
        let ChatRequest {
            model,
            messages,
            stream,
            params,
        } = self;

        let reasoning = merge_reasoning(&params)?;

        let input = messages
            .into_iter()
            .flat_map(ChatMessage::to_responses_items)
            .collect();

        let params = ResponsesParameters {
            max_output_tokens: params.max_completion_tokens,
            metadata: params.metadata,
            parallel_tool_calls: params.parallel_tool_calls,
            prompt_cache_key: params.prompt_cache_key,
            reasoning,
            safety_identifier: params.safety_identifier,
            service_tier: params.service_tier,
            stream_options: params.stream_options.map(|options| ResponsesStreamOptions {
                include_obfuscation: options.include_obfuscation,
            }),
            store: params.store,
            temperature: params.temperature,
            text: params.verbosity.map(|verbosity| ResponsesTextConfig {
                format: None,
                verbosity: Some(verbosity),
            }),
            top_logprobs: params.top_logprobs,
            top_p: params.top_p,
            tool_choice: params.tool_choice.map(Into::into),
            tools: params
                .tools
                .filter(|tools| !tools.is_empty())
                .map(|tools| tools.into_iter().map(Into::into).collect()),
            user: params.user,
            extra_params: params.extra_params,
            ..Default::default()
        };

        Ok(ResponsesRequest {
            model,
            input: ResponsesInput::Items(input),
            stream,
            params,
        })
    }
}

impl ResponsesRequest {
    /// Translates the request into the Chat Completions shape.
    ///
    /// `instructions` become a leading system message and a plain-string input
    /// becomes a single user message.
    pub fn to_chat_request(self) -> ChatRequest {
        let ResponsesRequest {
            model,
            input,
            stream,
            params,
        } = self;

        let mut messages = Vec::new();

        if let Some(instructions) = params.instructions.filter(|instructions| !instructions.is_empty()) {
            messages.push(ChatMessage::text(ChatRole::System, instructions));
        }

        match input {
            ResponsesInput::Text(text) => messages.push(ChatMessage::text(ChatRole::User, text)),
            ResponsesInput::Items(items) => messages.extend(to_chat_messages(items)),
        }

        let params = ChatParameters {
            max_completion_tokens: params.max_output_tokens,
            metadata: params.metadata,
            parallel_tool_calls: params.parallel_tool_calls,
            prompt_cache_key: params.prompt_cache_key,
            reasoning: params.reasoning.map(|reasoning| ChatReasoning {
                effort: reasoning.effort,
                max_tokens: reasoning.max_tokens,
            }),
            safety_identifier: params.safety_identifier,
            service_tier: params.service_tier,
            stream_options: params.stream_options.map(|options| ChatStreamOptions {
                include_obfuscation: options.include_obfuscation,
                include_usage: Some(true),
            }),
            store: params.store,
            temperature: params.temperature,
            top_logprobs: params.top_logprobs,
            top_p: params.top_p,
            tool_choice: params.tool_choice.map(Into::into),
            tools: params
                .tools
                .filter(|tools| !tools.is_empty())
                .map(|tools| tools.into_iter().map(Into::into).collect()),
            user: params.user,
            verbosity: params.text.and_then(|text| text.verbosity),
            extra_params: params.extra_params,
            ..Default::default()
        };

        ChatRequest {
            model,
            messages,
            stream,
            params,
        }
    }
}

fn merge_reasoning(params: &ChatParameters) -> MuxResult<Option<ResponsesReasoning>> {
    let nested = params.reasoning.clone().unwrap_or_default();

    let effort = pick("reasoning.effort", params.reasoning_effort.clone(), nested.effort)?;
    let max_tokens = pick("reasoning.max_tokens", params.reasoning_max_tokens, nested.max_tokens)?;

    if effort.is_none() && max_tokens.is_none() {
        return Ok(None);
    }

    Ok(Some(ResponsesReasoning {
        effort,
        max_tokens,
        summary: None,
    }))
}

fn pick<T>(parameter: &'static str, flat: Option<T>, nested: Option<T>) -> MuxResult<Option<T>>
where
    T: PartialEq + Display,
{
    match (flat, nested) {
        (Some(flat), Some(nested)) if flat != nested => {
            let error = MuxError::ConflictingParameter {
                parameter,
                flat: flat.to_string(),
                nested: nested.to_string(),
            };

            log::warn!("{error}");

            Err(error)
        }
        (flat, nested) => Ok(nested.or(flat)),
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use serde_json::json;

    use crate::{
        error::MuxError,
        messages::{chat::ChatRequest, responses::ResponsesRequest},
    };

    fn chat_request(body: &str) -> ChatRequest {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn chat_request_to_responses() {
        let request = chat_request(indoc! {r#"
            {
              "model": "gpt-4o",
              "messages": [
                { "role": "system", "content": "Be brief." },
                { "role": "user", "content": "What is the weather in Paris?" }
              ],
              "stream": true,
              "max_completion_tokens": 256,
              "temperature": 0.3,
              "seed": 7,
              "stop": ["\n\n"],
              "reasoning_effort": "low",
              "verbosity": "high",
              "stream_options": { "include_usage": true, "include_obfuscation": false },
              "tool_choice": "auto",
              "tools": [
                { "type": "function", "function": { "name": "get_weather", "parameters": { "type": "object" } } }
              ],
              "top_k": 40
            }
        "#});

        let converted = request.to_responses_request().unwrap();

        insta::assert_json_snapshot!(converted, @r#"
        {
          "model": "gpt-4o",
          "input": [
            {
              "type": "message",
              "role": "system",
              "content": "Be brief."
            },
            {
              "type": "message",
              "role": "user",
              "content": "What is the weather in Paris?"
            }
          ],
          "stream": true,
          "max_output_tokens": 256,
          "reasoning": {
            "effort": "low"
          },
          "stream_options": {
            "include_obfuscation": false
          },
          "temperature": 0.3,
          "text": {
            "verbosity": "high"
          },
          "tool_choice": "auto",
          "tools": [
            {
              "type": "function",
              "name": "get_weather",
              "parameters": {
                "type": "object"
              }
            }
          ],
          "top_k": 40
        }
        "#);
    }

    #[test]
    fn flat_and_nested_reasoning_merge() {
        let request = chat_request(indoc! {r#"
            {
              "model": "o3",
              "messages": [],
              "reasoning_effort": "medium",
              "reasoning": { "max_tokens": 2048 }
            }
        "#});

        let converted = request.to_responses_request().unwrap();
        let reasoning = converted.params.reasoning.unwrap();

        assert_eq!(reasoning.effort.as_deref(), Some("medium"));
        assert_eq!(reasoning.max_tokens, Some(2048));
    }

    #[test]
    fn conflicting_reasoning_is_rejected() {
        let request = chat_request(indoc! {r#"
            {
              "model": "o3",
              "messages": [],
              "reasoning_effort": "low",
              "reasoning": { "effort": "high" }
            }
        "#});

        let error = request.to_responses_request().unwrap_err();

        assert_eq!(
            error,
            MuxError::ConflictingParameter {
                parameter: "reasoning.effort",
                flat: "low".to_string(),
                nested: "high".to_string(),
            }
        );
    }

    #[test]
    fn conflicting_reasoning_budget_is_rejected() {
        let request = chat_request(indoc! {r#"
            {
              "model": "o3",
              "messages": [],
              "reasoning_max_tokens": 100,
              "reasoning": { "max_tokens": 200 }
            }
        "#});

        let error = request.to_responses_request().unwrap_err();
        assert_eq!(error.param(), Some("reasoning.max_tokens"));
    }

    #[test]
    fn responses_request_to_chat() {
        let request: ResponsesRequest = serde_json::from_value(json!({
            "model": "gpt-4o",
            "instructions": "Answer in French.",
            "input": "Hello",
            "max_output_tokens": 64,
            "reasoning": { "effort": "high", "summary": "auto" },
            "text": { "verbosity": "low" },
            "stream_options": { "include_obfuscation": true },
            "truncation": "auto"
        }))
        .unwrap();

        let converted = request.to_chat_request();

        insta::assert_json_snapshot!(converted, @r#"
        {
          "model": "gpt-4o",
          "messages": [
            {
              "role": "system",
              "content": "Answer in French."
            },
            {
              "role": "user",
              "content": "Hello"
            }
          ],
          "max_completion_tokens": 64,
          "reasoning": {
            "effort": "high"
          },
          "stream_options": {
            "include_obfuscation": true,
            "include_usage": true
          },
          "verbosity": "low"
        }
        "#);
    }

    #[test]
    fn responses_items_become_messages() {
        let request: ResponsesRequest = serde_json::from_value(json!({
            "model": "gpt-4o",
            "input": [
                { "type": "message", "role": "user", "content": "Weather?" },
                { "type": "function_call", "call_id": "call_1", "name": "get_weather", "arguments": "{}" },
                { "type": "function_call_output", "call_id": "call_1", "output": "sunny" }
            ]
        }))
        .unwrap();

        let converted = request.to_chat_request();
        let roles: Vec<_> = converted.messages.iter().map(|message| message.role.as_str()).collect();

        assert_eq!(roles, ["user", "assistant", "tool"]);
        assert_eq!(converted.params.stream_options, None);
    }

    #[test]
    fn parameters_survive_a_round_trip() {
        let request = chat_request(indoc! {r#"
            {
              "model": "gpt-4o",
              "messages": [{ "role": "user", "content": "hi" }],
              "max_completion_tokens": 10,
              "parallel_tool_calls": false,
              "prompt_cache_key": "k",
              "safety_identifier": "s",
              "service_tier": "flex",
              "store": true,
              "temperature": 1.0,
              "top_logprobs": 2,
              "top_p": 0.9,
              "metadata": { "team": "core" },
              "user": "u-1",
              "reasoning": { "effort": "minimal" },
              "verbosity": "medium"
            }
        "#});

        let back = request.clone().to_responses_request().unwrap().to_chat_request();

        assert_eq!(back.params, request.params);
        assert_eq!(back.messages, request.messages);
    }
}
