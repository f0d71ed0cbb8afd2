use std::path::Path;

use anyhow::Context;
use llm::messages::{
    chat::{ChatRequest, ChatResponse},
    responses::{ResponsesRequest, ResponsesResponse},
};

use crate::{args::Shape, io};

/// Converts one request body read from `input` into the `to` shape.
pub async fn request(to: Shape, input: Option<&Path>) -> anyhow::Result<()> {
    let body = io::read_to_string(input).await?;
    let output = convert_request(to, &body)?;

    io::write_stdout(&output).await
}

/// Converts one response body read from `input` into the `to` shape.
pub async fn response(to: Shape, input: Option<&Path>) -> anyhow::Result<()> {
    let body = io::read_to_string(input).await?;
    let output = convert_response(to, &body)?;

    io::write_stdout(&output).await
}

fn convert_request(to: Shape, body: &str) -> anyhow::Result<String> {
    let mut output = match to {
        Shape::Responses => {
            let request: ChatRequest = sonic_rs::from_str(body).context("Failed to parse chat completion request")?;
            let converted = request.to_responses_request()?;

            log::debug!("Converted chat request for model '{}'", converted.model);
            sonic_rs::to_string_pretty(&converted)?
        }
        Shape::Chat => {
            let request: ResponsesRequest = sonic_rs::from_str(body).context("Failed to parse responses request")?;
            let converted = request.to_chat_request();

            log::debug!("Converted responses request for model '{}'", converted.model);
            sonic_rs::to_string_pretty(&converted)?
        }
    };

    output.push('\n');

    Ok(output)
}

fn convert_response(to: Shape, body: &str) -> anyhow::Result<String> {
    let mut output = match to {
        Shape::Responses => {
            let response: ChatResponse =
                sonic_rs::from_str(body).context("Failed to parse chat completion response")?;

            sonic_rs::to_string_pretty(&response.to_responses_response())?
        }
        Shape::Chat => {
            let response: ResponsesResponse = sonic_rs::from_str(body).context("Failed to parse responses response")?;

            sonic_rs::to_string_pretty(&response.to_chat_response())?
        }
    };

    output.push('\n');

    Ok(output)
}
