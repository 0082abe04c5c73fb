use anyhow::{Context, Result};

/// Upstream AI provider, resolved once from the environment at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AiProviderConfig {
    Anthropic { api_key: String },
    OpenAi { api_key: String },
    Unconfigured,
}

impl AiProviderConfig {
    /// Anthropic wins when both keys are present. Blank values count as absent.
    pub fn resolve(anthropic_api_key: Option<String>, openai_api_key: Option<String>) -> Self {
        let present = |key: Option<String>| key.filter(|k| !k.trim().is_empty());

        if let Some(api_key) = present(anthropic_api_key) {
            AiProviderConfig::Anthropic { api_key }
        } else if let Some(api_key) = present(openai_api_key) {
            AiProviderConfig::OpenAi { api_key }
        } else {
            AiProviderConfig::Unconfigured
        }
    }
}

/// Application configuration loaded from environment variables.
/// Nothing is required: without AI keys the service runs on canned data.
#[derive(Debug, Clone)]
pub struct Config {
    pub ai_provider: AiProviderConfig,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            ai_provider: AiProviderConfig::resolve(
                optional_env("ANTHROPIC_API_KEY"),
                optional_env("OPENAI_API_KEY"),
            ),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}
