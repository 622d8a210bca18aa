//! Generator configuration with sensible defaults.
//!
//! [`GeneratorConfig`] captures the model settings and cache lifetime and
//! turns them into a ready [`OpenRouterGenerator`] and [`ResponseCache`].
//! The API key is read separately with [`api_key_from_env`] so that a
//! missing key can stop a binary before it serves anything.

use std::time::Duration;

use crate::cache::{DEFAULT_TTL, ResponseCache};
use crate::generation::OpenRouterGenerator;
use crate::{DEFAULT_MODEL, OpenRouterClient};

/// Environment variable holding the OpenRouter API key.
pub const API_KEY_ENV: &str = "OPENROUTER_KEY";

/// Settings shared by the CLI and the web server.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Model identifier. Default: [`DEFAULT_MODEL`].
    pub model: String,
    /// Maximum tokens per reply. Default: `2048`.
    pub max_tokens: u32,
    /// Sampling temperature. Default: `0.9`.
    pub temperature: f32,
    /// How long generated text stays cached. Default: one hour.
    pub cache_ttl: Duration,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 2048,
            temperature: 0.9,
            cache_ttl: DEFAULT_TTL,
        }
    }
}

impl GeneratorConfig {
    pub fn build_generator(&self, client: OpenRouterClient) -> OpenRouterGenerator {
        OpenRouterGenerator::new(client)
            .with_model(self.model.clone())
            .with_max_tokens(self.max_tokens)
            .with_temperature(self.temperature)
    }

    pub fn build_cache(&self) -> ResponseCache {
        ResponseCache::new(self.cache_ttl)
    }
}

/// Read the API key, loading a `.env` file from the working directory first.
pub fn api_key_from_env() -> Result<String, String> {
    dotenv::dotenv().ok();
    require_api_key(std::env::var(API_KEY_ENV).ok())
}

fn require_api_key(value: Option<String>) -> Result<String, String> {
    match value {
        Some(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
        _ => Err(format!(
            "API key not found! Set {API_KEY_ENV} in your environment or .env file."
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::TextGenerator;

    #[test]
    fn defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_tokens, 2048);
        assert_eq!(config.cache_ttl, Duration::from_secs(3600));
    }

    #[test]
    fn build_uses_config_values() {
        let config = GeneratorConfig {
            model: "openai/gpt-4o-mini".into(),
            cache_ttl: Duration::from_secs(60),
            ..Default::default()
        };
        let generator = config.build_generator(OpenRouterClient::new("key").unwrap());
        assert_eq!(generator.model_name(), "openai/gpt-4o-mini");
        assert_eq!(config.build_cache().ttl(), Duration::from_secs(60));
    }

    #[test]
    fn missing_or_blank_key_is_rejected() {
        let err = require_api_key(None).unwrap_err();
        assert!(err.contains(API_KEY_ENV));
        assert!(require_api_key(Some("   ".into())).is_err());
    }

    #[test]
    fn present_key_is_trimmed() {
        assert_eq!(require_api_key(Some(" sk-or-123\n".into())).unwrap(), "sk-or-123");
    }
}
