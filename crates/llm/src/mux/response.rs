use crate::messages::{
    chat::{ChatChoice, ChatMessage, ChatResponse, chat_completion_object},
    responses::{ResponsesResponse, ResponsesStatus},
};

use super::to_chat_messages;

impl ChatResponse {
    /// Flattens every choice's message into one ordered output list.
    pub fn to_responses_response(self) -> ResponsesResponse {
        let output = self
            .choices
            .into_iter()
            .flat_map(|choice| choice.message.to_responses_items())
            .collect();

        ResponsesResponse {
            model: Some(self.model),
            status: Some(ResponsesStatus::Completed),
            output,
            usage: self.usage.map(Into::into),
            ..ResponsesResponse::new(Some(self.id), self.created)
        }
    }
}

impl ResponsesResponse {
    /// Aggregates the output list into messages, one choice each.
    ///
    /// The Responses shape has no per-choice finish reason, so none is set.
    pub fn to_chat_response(self) -> ChatResponse {
        let choices = to_chat_messages(self.output)
            .into_iter()
            .enumerate()
            .map(|(index, message): (usize, ChatMessage)| ChatChoice {
                index,
                message,
                finish_reason: None,
            })
            .collect();

        ChatResponse {
            id: self.id.unwrap_or_default(),
            object: chat_completion_object(),
            created: self.created_at,
            model: self.model.unwrap_or_default(),
            choices,
            usage: self.usage.map(Into::into),
            system_fingerprint: None,
            service_tier: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::messages::{chat::ChatResponse, responses::ResponsesResponse};

    fn chat_response() -> ChatResponse {
        serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "created": 1700000000,
            "model": "gpt-4o",
            "choices": [
                {
                    "index": 0,
                    "message": { "role": "assistant", "content": "It is sunny." },
                    "finish_reason": "stop"
                },
                {
                    "index": 1,
                    "message": {
                        "role": "assistant",
                        "content": null,
                        "tool_calls": [
                            {
                                "id": "call_1",
                                "type": "function",
                                "function": { "name": "get_weather", "arguments": "{\"city\":\"Paris\"}" }
                            }
                        ]
                    },
                    "finish_reason": "tool_calls"
                }
            ],
            "usage": { "prompt_tokens": 9, "completion_tokens": 12, "total_tokens": 21 }
        }))
        .unwrap()
    }

    #[test]
    fn choices_flatten_into_output() {
        let converted = chat_response().to_responses_response();

        insta::assert_json_snapshot!(converted, @r#"
        {
          "id": "chatcmpl-1",
          "object": "response",
          "created_at": 1700000000,
          "model": "gpt-4o",
          "status": "completed",
          "output": [
            {
              "type": "message",
              "role": "assistant",
              "content": [
                {
                  "type": "output_text",
                  "text": "It is sunny."
                }
              ]
            },
            {
              "type": "function_call",
              "call_id": "call_1",
              "name": "get_weather",
              "arguments": "{\"city\":\"Paris\"}"
            }
          ],
          "usage": {
            "input_tokens": 9,
            "output_tokens": 12,
            "total_tokens": 21
          }
        }
        "#);
    }

    #[test]
    fn output_regroups_into_choices() {
        let converted = chat_response().to_responses_response().to_chat_response();

        insta::assert_json_snapshot!(converted, @r#"
        {
          "id": "chatcmpl-1",
          "object": "chat.completion",
          "created": 1700000000,
          "model": "gpt-4o",
          "choices": [
            {
              "index": 0,
              "message": {
                "role": "assistant",
                "content": "It is sunny."
              },
              "finish_reason": null
            },
            {
              "index": 1,
              "message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [
                  {
                    "type": "function",
                    "id": "call_1",
                    "function": {
                      "name": "get_weather",
                      "arguments": "{\"city\":\"Paris\"}"
                    }
                  }
                ]
              },
              "finish_reason": null
            }
          ],
          "usage": {
            "prompt_tokens": 9,
            "completion_tokens": 12,
            "total_tokens": 21
          }
        }
        "#);
    }

    #[test]
    fn absent_usage_stays_absent() {
        let mut response = chat_response();
        response.usage = None;

        let converted = response.to_responses_response();
        assert_eq!(converted.usage, None);

        let back = converted.to_chat_response();
        assert_eq!(back.usage, None);
    }

    #[test]
    fn empty_output() {
        let response: ResponsesResponse = serde_json::from_value(json!({
            "id": "resp_1",
            "created_at": 5,
            "status": "completed"
        }))
        .unwrap();

        let converted = response.to_chat_response();

        assert!(converted.choices.is_empty());
        assert_eq!(converted.model, "");
        assert_eq!(converted.object, "chat.completion");
    }
}
