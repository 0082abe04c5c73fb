use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{api_error, LlmError, MAX_TOKENS};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const MODEL: &str = "gpt-4o";

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<ChatMessage<'a>>,
    response_format: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

pub(super) async fn complete(
    client: &Client,
    base_url: &str,
    api_key: &str,
    system: &str,
    prompt: &str,
) -> Result<String, LlmError> {
    let body = ChatCompletionRequest {
        model: MODEL,
        max_tokens: MAX_TOKENS,
        messages: vec![
            ChatMessage {
                role: "system",
                content: system,
            },
            ChatMessage {
                role: "user",
                content: prompt,
            },
        ],
        response_format: json!({ "type": "json_object" }),
    };

    let response = client
        .post(format!("{base_url}/v1/chat/completions"))
        .bearer_auth(api_key)
        .json(&body)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(api_error(response).await);
    }

    let parsed: ChatCompletionResponse = response.json().await?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or(LlmError::EmptyContent)
}
