//! AI configuration from environment variables.

use std::env;
use thiserror::Error;

/// Gemini's OpenAI-compatible endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// Default model to use.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),
}

/// AI client configuration.
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// API key for the chat-completions endpoint.
    pub api_key: String,
    /// Model name (e.g., "gemini-2.5-flash").
    pub model: String,
    /// Base URL for the API.
    pub base_url: String,
}

impl AiConfig {
    /// Build a configuration with default model and endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `SOUS_AI_API_KEY` (or `GEMINI_API_KEY`): API key
    ///
    /// Optional:
    /// - `SOUS_AI_MODEL`: Model name (default: "gemini-2.5-flash")
    /// - `SOUS_AI_BASE_URL`: API base URL (default: Gemini's OpenAI-compatible endpoint)
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = env::var("SOUS_AI_API_KEY")
            .or_else(|_| env::var("GEMINI_API_KEY"))
            .map_err(|_| ConfigError::MissingEnvVar("SOUS_AI_API_KEY".to_string()))?;

        let model = env::var("SOUS_AI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let base_url =
            env::var("SOUS_AI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            api_key,
            model,
            base_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_defaults() {
        let config = AiConfig::new("key");
        assert_eq!(config.api_key, "key");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }
}
