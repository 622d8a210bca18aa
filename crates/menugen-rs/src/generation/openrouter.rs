//! [`TextGenerator`] backed by the OpenRouter chat completions API.

use tracing::{debug, warn};

use super::{GenerationFuture, GenerationUnavailable, TextGenerator, text_or_sentinel};
use crate::{ChatRequest, DEFAULT_MODEL, Message, OpenRouterClient};

/// Sends each prompt as a single user message to one model.
pub struct OpenRouterGenerator {
    client: OpenRouterClient,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenRouterGenerator {
    /// Create a generator for [`DEFAULT_MODEL`] with the API's default
    /// sampling settings.
    pub fn new(client: OpenRouterClient) -> Self {
        Self {
            client,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 0,
            temperature: 0.0,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Cap on reply tokens. `0` leaves it to the provider.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Sampling temperature. `0.0` leaves it to the provider.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    fn request_for(&self, prompt: &str) -> ChatRequest {
        ChatRequest {
            model: Some(self.model.clone()),
            messages: vec![Message::user(prompt)],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            ..Default::default()
        }
    }
}

impl TextGenerator for OpenRouterGenerator {
    fn generate(&self, prompt: &str) -> GenerationFuture<'_> {
        let body = self.request_for(prompt);
        Box::pin(async move {
            let completion = self.client.chat(&body).await.map_err(|e| {
                warn!(model = %self.model, error = %e, "Generation failed");
                GenerationUnavailable::new(e)
            })?;
            if completion.content.is_none() {
                debug!(model = %self.model, "Reply carried no text, using sentinel");
            }
            Ok(text_or_sentinel(completion.content))
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> OpenRouterGenerator {
        OpenRouterGenerator::new(OpenRouterClient::new("test-key").unwrap())
    }

    #[test]
    fn defaults_to_default_model() {
        assert_eq!(generator().model_name(), DEFAULT_MODEL);
    }

    #[test]
    fn request_carries_prompt_and_settings() {
        let generator = generator()
            .with_model("anthropic/claude-haiku")
            .with_max_tokens(512)
            .with_temperature(0.7);
        let request = generator.request_for("Suggest a name");

        assert_eq!(request.model.as_deref(), Some("anthropic/claude-haiku"));
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].content.as_deref(), Some("Suggest a name"));
        assert_eq!(request.max_tokens, 512);
        assert!((request.temperature - 0.7).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_unavailable() {
        // Port 9 (discard) is closed on any sane test host.
        let client = OpenRouterClient::new("test-key")
            .unwrap()
            .with_endpoint("http://127.0.0.1:9/v1/chat/completions");
        let generator = OpenRouterGenerator::new(client);

        let err = generator.generate("hello").await.unwrap_err();
        assert!(err.reason().starts_with("request failed"), "{err}");
    }
}
