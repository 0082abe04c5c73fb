use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{api_error, LlmError, MAX_TOKENS};

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";
pub const MODEL: &str = "claude-sonnet-4-5";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

pub(super) async fn complete(
    client: &Client,
    base_url: &str,
    api_key: &str,
    system: &str,
    prompt: &str,
) -> Result<String, LlmError> {
    let body = MessagesRequest {
        model: MODEL,
        max_tokens: MAX_TOKENS,
        system,
        messages: vec![Message {
            role: "user",
            content: prompt,
        }],
    };

    let response = client
        .post(format!("{base_url}/v1/messages"))
        .header("x-api-key", api_key)
        .header("anthropic-version", ANTHROPIC_VERSION)
        .header("content-type", "application/json")
        .json(&body)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(api_error(response).await);
    }

    let parsed: MessagesResponse = response.json().await?;
    if let Some(usage) = &parsed.usage {
        debug!(
            "Anthropic call succeeded: input_tokens={}, output_tokens={}",
            usage.input_tokens, usage.output_tokens
        );
    }

    parsed
        .content
        .into_iter()
        .find(|b| b.block_type == "text")
        .and_then(|b| b.text)
        .ok_or(LlmError::EmptyContent)
}
