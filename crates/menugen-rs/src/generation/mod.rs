//! Text generation capability.
//!
//! The [`TextGenerator`] trait is the only thing the cache and the service
//! know about the model: a prompt goes in, text comes out. Two outcomes are
//! deliberately kept apart:
//!
//! - The service could not be reached, answered with an error status, or
//!   sent an unreadable body. That is a [`GenerationUnavailable`] error and
//!   is propagated to the caller without retry.
//! - The service answered but the reply carries no text. That is not an
//!   error; the generator returns the [`NO_RESPONSE`] sentinel and the flow
//!   continues.

mod fake;
mod openrouter;

pub use fake::FakeGenerator;
pub use openrouter::OpenRouterGenerator;

use std::fmt;
use std::future::Future;
use std::pin::Pin;

/// Text returned in place of a reply that had no extractable content.
pub const NO_RESPONSE: &str = "No response";

/// Boxed future returned by [`TextGenerator::generate`].
///
/// Type alias to keep trait signatures and implementations readable.
pub type GenerationFuture<'a> =
    Pin<Box<dyn Future<Output = Result<String, GenerationUnavailable>> + Send + 'a>>;

/// A hosted text-generation service, reduced to prompt in, text out.
///
/// Uses a boxed future so that the trait is dyn-compatible and can be shared
/// as `Arc<dyn TextGenerator>` between request handlers.
pub trait TextGenerator: Send + Sync {
    /// Send one prompt and return the reply text, or [`NO_RESPONSE`] if the
    /// reply had none.
    fn generate(&self, prompt: &str) -> GenerationFuture<'_>;

    /// Model identifier, for logging.
    fn model_name(&self) -> &str;
}

/// The generation service could not produce a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationUnavailable {
    reason: String,
}

impl GenerationUnavailable {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl fmt::Display for GenerationUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "generation service unavailable: {}", self.reason)
    }
}

impl std::error::Error for GenerationUnavailable {}

/// Trim reply content, substituting [`NO_RESPONSE`] when there is none.
///
/// Whitespace-only content counts as none.
pub fn text_or_sentinel(content: Option<String>) -> String {
    match content {
        Some(text) if !text.trim().is_empty() => text.trim().to_string(),
        _ => NO_RESPONSE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_for_missing_content() {
        assert_eq!(text_or_sentinel(None), "No response");
    }

    #[test]
    fn sentinel_for_blank_content() {
        assert_eq!(text_or_sentinel(Some(String::new())), NO_RESPONSE);
        assert_eq!(text_or_sentinel(Some(" \n\t ".into())), NO_RESPONSE);
    }

    #[test]
    fn content_is_trimmed() {
        assert_eq!(
            text_or_sentinel(Some("\n  The Saffron Table \n".into())),
            "The Saffron Table"
        );
    }

    #[test]
    fn unavailable_display_includes_reason() {
        let err = GenerationUnavailable::new("request failed: connection refused");
        assert_eq!(err.reason(), "request failed: connection refused");
        assert_eq!(
            err.to_string(),
            "generation service unavailable: request failed: connection refused"
        );
    }
}
