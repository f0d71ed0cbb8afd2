use crate::messages::{
    chat::{ChatPromptTokensDetails, LlmUsage},
    responses::{ResponsesInputTokensDetails, ResponsesUsage},
};

impl From<LlmUsage> for ResponsesUsage {
    fn from(usage: LlmUsage) -> Self {
        Self {
            input_tokens: usage.prompt_tokens,
            input_tokens_details: usage.prompt_tokens_details.map(|details| ResponsesInputTokensDetails {
                text_tokens: None,
                audio_tokens: details.audio_tokens,
                image_tokens: None,
                cached_tokens: details.cached_tokens,
            }),
            output_tokens: usage.completion_tokens,
            output_tokens_details: usage.completion_tokens_details,
            total_tokens: usage.total_tokens,
            cost: usage.cost,
        }
    }
}

impl From<ResponsesUsage> for LlmUsage {
    fn from(usage: ResponsesUsage) -> Self {
        // The chat shape has no text or image split of the prompt.
        Self {
            prompt_tokens: usage.input_tokens,
            prompt_tokens_details: usage.input_tokens_details.map(|details| ChatPromptTokensDetails {
                audio_tokens: details.audio_tokens,
                cached_tokens: details.cached_tokens,
            }),
            completion_tokens: usage.output_tokens,
            completion_tokens_details: usage.output_tokens_details,
            total_tokens: usage.total_tokens,
            cost: usage.cost,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::messages::{chat::LlmUsage, responses::ResponsesUsage};

    #[test]
    fn chat_to_responses() {
        let usage: LlmUsage = serde_json::from_value(json!({
            "prompt_tokens": 12,
            "prompt_tokens_details": { "cached_tokens": 4 },
            "completion_tokens": 30,
            "completion_tokens_details": { "reasoning_tokens": 20 },
            "total_tokens": 42,
            "cost": { "total_cost": 0.0012 }
        }))
        .unwrap();

        let converted = ResponsesUsage::from(usage.clone());

        insta::assert_json_snapshot!(converted, @r#"
        {
          "input_tokens": 12,
          "input_tokens_details": {
            "cached_tokens": 4
          },
          "output_tokens": 30,
          "output_tokens_details": {
            "reasoning_tokens": 20
          },
          "total_tokens": 42,
          "cost": {
            "total_cost": 0.0012
          }
        }
        "#);

        assert_eq!(LlmUsage::from(converted), usage);
    }

    #[test]
    fn missing_details_stay_missing() {
        let usage = ResponsesUsage::from(LlmUsage {
            prompt_tokens: 1,
            completion_tokens: 2,
            total_tokens: 3,
            ..Default::default()
        });

        assert_eq!(usage.input_tokens_details, None);
        assert_eq!(usage.output_tokens_details, None);
        assert_eq!(usage.cost, None);
    }

    #[test]
    fn text_and_image_split_is_dropped() {
        let usage: ResponsesUsage = serde_json::from_value(json!({
            "input_tokens": 10,
            "input_tokens_details": { "text_tokens": 6, "image_tokens": 3, "audio_tokens": 1 },
            "output_tokens": 5,
            "total_tokens": 15
        }))
        .unwrap();

        let converted = LlmUsage::from(usage);

        insta::assert_json_snapshot!(converted, @r#"
        {
          "prompt_tokens": 10,
          "prompt_tokens_details": {
            "audio_tokens": 1
          },
          "completion_tokens": 5,
          "total_tokens": 15
        }
        "#);
    }
}
