//! Convenience re-exports for common `menugen-rs` types.
//!
//! Meant to be glob-imported by binaries and front ends:
//!
//! ```ignore
//! use menugen_rs::prelude::*;
//! ```
//!
//! This pulls in the client, the generator trait and its implementations,
//! the cache, the sectioner, the export type, and the service. Wire-level
//! types (`ChatRequest`, `UsageInfo`) stay in the crate root.

// ── Core types ──────────────────────────────────────────────────────
pub use crate::{DEFAULT_MODEL, Message, OpenRouterClient};

// ── Generation ──────────────────────────────────────────────────────
pub use crate::generation::{
    FakeGenerator, GenerationFuture, GenerationUnavailable, NO_RESPONSE, OpenRouterGenerator,
    TextGenerator,
};

// ── Prompts and caching ─────────────────────────────────────────────
pub use crate::cache::{CacheStats, CachedText, DEFAULT_TTL, ResponseCache};
pub use crate::prompt::{
    GenerationKind, GenerationRequest, OTHER_COUNTRY, POPULAR_COUNTRIES, RESTAURANT_STYLES,
    build_menu_prompt, build_name_prompt, country_from_label, strip_label_icon,
};

// ── Menu and export ─────────────────────────────────────────────────
pub use crate::export::MenuExport;
pub use crate::menu::{HeaderPolicy, MenuSection, SectionLabel, render_sections, section_menu};

// ── Orchestration ───────────────────────────────────────────────────
pub use crate::config::{API_KEY_ENV, GeneratorConfig, api_key_from_env};
pub use crate::service::{GenerateError, GeneratedRestaurant, GenerationPhase, MenuGenerator};
