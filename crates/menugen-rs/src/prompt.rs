//! Prompt templates and the request key they are built from.
//!
//! Both prompts are plain template substitution over the user's country and
//! style. The model is asked for a fixed menu shape, but nothing downstream
//! relies on it being honored.

use serde::Serialize;

/// Which of the two generations a request is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationKind {
    Name,
    Menu,
}

impl std::fmt::Display for GenerationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationKind::Name => write!(f, "name"),
            GenerationKind::Menu => write!(f, "menu"),
        }
    }
}

/// Identity of one generation: country, style, and kind.
///
/// Used as the response cache key, so every field takes part in equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenerationRequest {
    country: String,
    style: String,
    kind: GenerationKind,
}

impl GenerationRequest {
    pub fn new(country: impl Into<String>, style: impl Into<String>, kind: GenerationKind) -> Self {
        Self {
            country: country.into(),
            style: style.into(),
            kind,
        }
    }

    pub fn name(country: impl Into<String>, style: impl Into<String>) -> Self {
        Self::new(country, style, GenerationKind::Name)
    }

    pub fn menu(country: impl Into<String>, style: impl Into<String>) -> Self {
        Self::new(country, style, GenerationKind::Menu)
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn style(&self) -> &str {
        &self.style
    }

    pub fn kind(&self) -> GenerationKind {
        self.kind
    }

    /// Render the prompt for this request.
    pub fn prompt(&self) -> String {
        match self.kind {
            GenerationKind::Name => build_name_prompt(&self.country, &self.style),
            GenerationKind::Menu => build_menu_prompt(&self.country, &self.style),
        }
    }
}

pub fn build_name_prompt(country: &str, style: &str) -> String {
    format!(
        "Suggest a unique and catchy restaurant name for a {style} style restaurant in {country}. \
         Make it creative and memorable."
    )
}

/// Menu prompt asking for 5 starters, 5 mains, 3 desserts and 3 beverages.
pub fn build_menu_prompt(country: &str, style: &str) -> String {
    format!(
        "Create a detailed menu for a {style} style restaurant in {country}. \
         Include 5 starters, 5 main courses, 3 desserts, and 3 beverages. \
         Format it with clear sections and descriptions. Make it authentic to the cuisine."
    )
}

// ── Preset choices ─────────────────────────────────────────────────

/// Label of the country choice that asks the user to type their own.
pub const OTHER_COUNTRY: &str = "Other";

/// Countries offered by the form, flag first.
pub const POPULAR_COUNTRIES: &[&str] = &[
    "🇮🇳 India",
    "🇺🇸 United States",
    "🇮🇹 Italy",
    "🇯🇵 Japan",
    "🇫🇷 France",
    "🇨🇳 China",
    "🇹🇭 Thailand",
    "🇲🇽 Mexico",
    "🇬🇷 Greece",
    "🇪🇸 Spain",
    "🇰🇷 South Korea",
    "🇧🇷 Brazil",
    "🇬🇧 United Kingdom",
    "🇩🇪 Germany",
    "🇹🇷 Turkey",
    OTHER_COUNTRY,
];

/// Restaurant styles offered by the form, icon first.
pub const RESTAURANT_STYLES: &[&str] = &[
    "🏛️ Traditional",
    "✨ Modern",
    "🌮 Street Food",
    "👑 Luxury",
    "🌍 Fusion",
    "☕ Café",
    "🍕 Casual Dining",
    "🍣 Fine Dining",
];

/// Drop the leading icon token from a preset label.
///
/// `"🇮🇳 India"` becomes `"India"`. Labels without an icon (`"Other"`, or
/// free text typed by the user) come back trimmed but otherwise unchanged.
pub fn strip_label_icon(label: &str) -> &str {
    let label = label.trim();
    match label.split_once(' ') {
        Some((head, rest)) if !head.chars().any(|c| c.is_alphanumeric()) => rest.trim(),
        _ => label,
    }
}

/// The country a form or CLI value stands for.
///
/// Strips the icon like [`strip_label_icon`]. The bare [`OTHER_COUNTRY`]
/// choice names no country, so it comes back empty and fails validation.
pub fn country_from_label(label: &str) -> &str {
    match strip_label_icon(label) {
        OTHER_COUNTRY => "",
        country => country,
    }
}
