//! One form submission, end to end.
//!
//! [`MenuGenerator`] validates the two inputs, fetches the name and then the
//! menu through the shared [`ResponseCache`], and sections the menu. The two
//! generations run one after the other; the menu does not depend on the
//! name.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::cache::ResponseCache;
use crate::export::MenuExport;
use crate::generation::{GenerationUnavailable, TextGenerator};
use crate::menu::{MenuSection, render_sections, section_menu};
use crate::prompt::GenerationRequest;

/// Why a submission produced no result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    /// A required field was empty. Carries the field name.
    MissingInput(&'static str),
    /// The generation service failed.
    Unavailable(GenerationUnavailable),
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerateError::MissingInput(_) => {
                write!(f, "Please fill in both country and style fields.")
            }
            GenerateError::Unavailable(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for GenerateError {}

impl From<GenerationUnavailable> for GenerateError {
    fn from(e: GenerationUnavailable) -> Self {
        GenerateError::Unavailable(e)
    }
}

/// Progress steps reported while a submission runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationPhase {
    Name,
    Menu,
    Complete,
}

impl GenerationPhase {
    pub fn message(self) -> &'static str {
        match self {
            GenerationPhase::Name => "🎯 Generating restaurant name...",
            GenerationPhase::Menu => "📋 Generating menu...",
            GenerationPhase::Complete => "✅ Complete!",
        }
    }

    /// Rough completion percentage at the start of this phase.
    pub fn percent(self) -> u8 {
        match self {
            GenerationPhase::Name => 25,
            GenerationPhase::Menu => 50,
            GenerationPhase::Complete => 100,
        }
    }
}

/// Result of one submission.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedRestaurant {
    pub country: String,
    pub style: String,
    pub name: String,
    /// Menu exactly as the model returned it.
    pub menu_text: String,
    pub sections: Vec<MenuSection>,
}

impl GeneratedRestaurant {
    /// The download artifact, built from the raw menu text.
    pub fn export(&self) -> MenuExport {
        MenuExport::new(&self.name, &self.menu_text)
    }

    /// Sectioned menu as markdown.
    pub fn render_markdown(&self) -> String {
        render_sections(&self.sections)
    }
}

/// Runs submissions against a generator and a shared cache.
pub struct MenuGenerator {
    generator: Arc<dyn TextGenerator>,
    cache: Arc<ResponseCache>,
}

impl MenuGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>, cache: Arc<ResponseCache>) -> Self {
        Self { generator, cache }
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn model_name(&self) -> &str {
        self.generator.model_name()
    }

    /// Text for one request, from the cache when fresh.
    pub async fn generate_text(
        &self,
        request: &GenerationRequest,
    ) -> Result<String, GenerationUnavailable> {
        self.cache
            .get_or_compute(request, || self.generator.generate(&request.prompt()))
            .await
    }

    /// Only the name step of a submission, with the same validation.
    ///
    /// A later [`generate`](Self::generate) for the same inputs reads the
    /// name from the cache.
    pub async fn generate_name(&self, country: &str, style: &str) -> Result<String, GenerateError> {
        let country = require("country", country)?;
        let style = require("style", style)?;
        info!(country, style, model = self.model_name(), "Generating restaurant name");
        let name = self
            .generate_text(&GenerationRequest::name(country, style))
            .await
            .inspect_err(|e| warn!(error = %e, "Name generation failed"))?;
        Ok(name)
    }

    /// Run a submission.
    pub async fn generate(
        &self,
        country: &str,
        style: &str,
    ) -> Result<GeneratedRestaurant, GenerateError> {
        self.generate_with_progress(country, style, |_| {}).await
    }

    /// Run a submission, calling `on_phase` as each step starts.
    ///
    /// Inputs are trimmed. An empty country or style fails before any
    /// generation call is made.
    pub async fn generate_with_progress(
        &self,
        country: &str,
        style: &str,
        mut on_phase: impl FnMut(GenerationPhase) + Send,
    ) -> Result<GeneratedRestaurant, GenerateError> {
        let country = require("country", country)?;
        let style = require("style", style)?;

        on_phase(GenerationPhase::Name);
        info!(country, style, model = self.model_name(), "Generating restaurant name");
        let name = self
            .generate_text(&GenerationRequest::name(country, style))
            .await
            .inspect_err(|e| warn!(error = %e, "Name generation failed"))?;

        on_phase(GenerationPhase::Menu);
        info!(country, style, "Generating menu");
        let menu_text = self
            .generate_text(&GenerationRequest::menu(country, style))
            .await
            .inspect_err(|e| warn!(error = %e, "Menu generation failed"))?;

        let sections = section_menu(&menu_text);
        info!(
            name = %name,
            sections = sections.len(),
            items = sections.iter().map(|s| s.items.len()).sum::<usize>(),
            "Generation complete"
        );
        on_phase(GenerationPhase::Complete);

        Ok(GeneratedRestaurant {
            country: country.to_string(),
            style: style.to_string(),
            name,
            menu_text,
            sections,
        })
    }
}

fn require<'a>(field: &'static str, value: &'a str) -> Result<&'a str, GenerateError> {
    let value = value.trim();
    if value.is_empty() {
        Err(GenerateError::MissingInput(field))
    } else {
        Ok(value)
    }
}
