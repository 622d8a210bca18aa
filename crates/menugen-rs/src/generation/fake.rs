//! Fake text generator for tests.
//!
//! Returns canned responses matched on prompt substrings, so tests of the
//! cache, the service and the web API run without network access.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use super::{GenerationFuture, GenerationUnavailable, NO_RESPONSE, TextGenerator};

/// A fake [`TextGenerator`].
///
/// Responses are matched by checking, in registration order, whether the
/// prompt contains a registered substring (case-insensitive). Without a
/// match the default response is used, or the call fails if there is none.
#[derive(Debug, Default)]
pub struct FakeGenerator {
    responses: Vec<(String, String)>,
    default_response: Option<String>,
    numbered: bool,
    delay: Option<Duration>,
    unavailable: AtomicBool,
    calls: AtomicUsize,
}

impl FakeGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond with `response` to prompts containing `prompt_contains`.
    pub fn with_response(mut self, prompt_contains: &str, response: &str) -> Self {
        self.responses
            .push((prompt_contains.to_lowercase(), response.to_string()));
        self
    }

    /// Response used when no registered substring matches.
    pub fn with_default_response(mut self, response: &str) -> Self {
        self.default_response = Some(response.to_string());
        self
    }

    /// Append ` #<call number>` to every response, so repeated calls for
    /// the same prompt are distinguishable.
    pub fn numbered(mut self) -> Self {
        self.numbered = true;
        self
    }

    /// Sleep before answering, to hold calls in flight.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Canned responses for the name and menu prompts.
    pub fn restaurant(name: &str, menu: &str) -> Self {
        Self::new()
            .with_response("restaurant name", name)
            .with_response("detailed menu", menu)
    }

    /// A generator whose replies never carry text.
    pub fn silent() -> Self {
        Self::new().with_default_response(NO_RESPONSE)
    }

    /// Make subsequent calls fail (or succeed again).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of `generate` calls so far, including failed ones.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn respond(&self, prompt: &str, call: usize) -> Result<String, GenerationUnavailable> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(GenerationUnavailable::new(
                "FakeGenerator: service marked unavailable",
            ));
        }

        let prompt_lower = prompt.to_lowercase();
        let response = self
            .responses
            .iter()
            .find(|(pattern, _)| prompt_lower.contains(pattern))
            .map(|(_, response)| response.clone())
            .or_else(|| self.default_response.clone())
            .ok_or_else(|| {
                GenerationUnavailable::new(format!(
                    "FakeGenerator: no response configured for prompt: {}",
                    prompt.chars().take(100).collect::<String>()
                ))
            })?;

        if self.numbered {
            Ok(format!("{response} #{call}"))
        } else {
            Ok(response)
        }
    }
}

impl TextGenerator for FakeGenerator {
    fn generate(&self, prompt: &str) -> GenerationFuture<'_> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let prompt = prompt.to_string();
        Box::pin(async move {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.respond(&prompt, call)
        })
    }

    fn model_name(&self) -> &str {
        "fake-model"
    }
}
