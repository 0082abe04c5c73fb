/// LLM Client — the single point of entry for all upstream model calls.
///
/// No other module may talk to Anthropic or OpenAI directly.
/// One request per call: no retries, no backoff.
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;

mod anthropic;
mod openai;
pub mod prompts;

const REQUEST_TIMEOUT_SECS: u64 = 120;
const MAX_TOKENS: u32 = 4096;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Upstream API family a client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Anthropic,
    OpenAi,
}

impl Backend {
    pub fn model(&self) -> &'static str {
        match self {
            Backend::Anthropic => anthropic::MODEL,
            Backend::OpenAi => openai::MODEL,
        }
    }

    fn default_base_url(&self) -> &'static str {
        match self {
            Backend::Anthropic => anthropic::DEFAULT_BASE_URL,
            Backend::OpenAi => openai::DEFAULT_BASE_URL,
        }
    }
}

#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    backend: Backend,
    api_key: String,
    base_url: String,
}

impl LlmClient {
    pub fn new(backend: Backend, api_key: String) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            backend,
            api_key,
            base_url: backend.default_base_url().to_string(),
        })
    }

    /// Points the client at a local mock server.
    #[cfg(test)]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Sends one prompt and returns the model's text reply.
    pub async fn call(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        match self.backend {
            Backend::Anthropic => {
                anthropic::complete(&self.client, &self.base_url, &self.api_key, system, prompt)
                    .await
            }
            Backend::OpenAi => {
                openai::complete(&self.client, &self.base_url, &self.api_key, system, prompt).await
            }
        }
    }

    /// Calls the LLM and deserializes the text response as JSON.
    /// The prompt must instruct the model to return valid JSON.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        system: &str,
    ) -> Result<T, LlmError> {
        let text = self.call(prompt, system).await?;
        let text = strip_json_fences(&text);
        if text.is_empty() {
            return Err(LlmError::EmptyContent);
        }
        serde_json::from_str(text).map_err(LlmError::Parse)
    }
}

/// Reads an error body, preferring the provider's `{"error": {"message"}}` shape.
async fn api_error(response: reqwest::Response) -> LlmError {
    #[derive(serde::Deserialize)]
    struct ErrorEnvelope {
        error: ErrorBody,
    }

    #[derive(serde::Deserialize)]
    struct ErrorBody {
        message: String,
    }

    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
    LlmError::Api { status, message }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
