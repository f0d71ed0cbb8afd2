use serde::{Deserialize, Deserializer, Serialize};

/// Monetary cost of a request, reported by providers that price their own calls.
///
/// Identical in both shapes. Some providers report a single number, which is
/// read as the total.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Cost {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_tokens_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_tokens_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning_tokens_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub citation_tokens_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_queries_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_cost: Option<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CostRepr {
    Total(f64),
    Breakdown {
        #[serde(default)]
        input_tokens_cost: Option<f64>,
        #[serde(default)]
        output_tokens_cost: Option<f64>,
        #[serde(default)]
        reasoning_tokens_cost: Option<f64>,
        #[serde(default)]
        citation_tokens_cost: Option<f64>,
        #[serde(default)]
        search_queries_cost: Option<f64>,
        #[serde(default)]
        request_cost: Option<f64>,
        #[serde(default)]
        total_cost: Option<f64>,
    },
}

impl<'de> Deserialize<'de> for Cost {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let cost = match CostRepr::deserialize(deserializer)? {
            CostRepr::Total(total) => Cost {
                total_cost: Some(total),
                ..Default::default()
            },
            CostRepr::Breakdown {
                input_tokens_cost,
                output_tokens_cost,
                reasoning_tokens_cost,
                citation_tokens_cost,
                search_queries_cost,
                request_cost,
                total_cost,
            } => Cost {
                input_tokens_cost,
                output_tokens_cost,
                reasoning_tokens_cost,
                citation_tokens_cost,
                search_queries_cost,
                request_cost,
                total_cost,
            },
        };

        Ok(cost)
    }
}
