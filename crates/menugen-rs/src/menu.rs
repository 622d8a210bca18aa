//! Keyword-based menu sectioning.
//!
//! The model returns the menu as free-form text. [`section_menu`] buckets
//! its lines into four fixed sections with a small state machine: a line
//! containing a section keyword switches the current section and is treated
//! as a header; any other line is an item of the current section. There is
//! no backtracking.
//!
//! This is a best-effort classifier, not a parser. Known failure modes:
//!
//! - An item whose text contains a keyword ("Mango lassi, a sweet yogurt
//!   drink") is taken for a header and switches the section.
//! - Lines before the first header are dropped.
//! - Keywords match as substrings, so "domain" would open the main courses.

use serde::{Deserialize, Serialize};

/// The four menu sections, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionLabel {
    Starters,
    MainCourses,
    Desserts,
    Beverages,
}

impl SectionLabel {
    /// All labels in display order. Also the keyword priority order.
    pub const ALL: [SectionLabel; 4] = [
        SectionLabel::Starters,
        SectionLabel::MainCourses,
        SectionLabel::Desserts,
        SectionLabel::Beverages,
    ];

    /// Heading shown above the section.
    pub fn title(self) -> &'static str {
        match self {
            SectionLabel::Starters => "🥗 Starters",
            SectionLabel::MainCourses => "🍛 Main Courses",
            SectionLabel::Desserts => "🍰 Desserts",
            SectionLabel::Beverages => "🍹 Beverages",
        }
    }

    /// Lowercase keywords that open this section.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            SectionLabel::Starters => &["starter", "appetizer", "entree"],
            SectionLabel::MainCourses => &["main", "course", "dish"],
            SectionLabel::Desserts => &["dessert", "sweet"],
            SectionLabel::Beverages => &["beverage", "drink"],
        }
    }

    /// The section a line opens, if it contains any keyword.
    ///
    /// Case-insensitive; the first label in [`ALL`](Self::ALL) order wins.
    pub fn classify(line: &str) -> Option<SectionLabel> {
        let lower = line.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|label| label.keywords().iter().any(|k| lower.contains(k)))
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for SectionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

/// One non-empty section of a menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuSection {
    pub label: SectionLabel,
    pub items: Vec<String>,
}

/// What to do with text that shares a line with a section header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderPolicy {
    /// Keep the text after the header's first `:` as an item of the new
    /// section, so `"Main course: Butter chicken"` yields `"Butter chicken"`.
    #[default]
    KeepRemainder,
    /// Treat the whole line as a header and drop it.
    Discard,
}

/// Section menu text with the default [`HeaderPolicy`].
///
/// Returns only non-empty sections, in display order.
pub fn section_menu(text: &str) -> Vec<MenuSection> {
    section_menu_with(text, HeaderPolicy::default())
}

/// Section menu text with an explicit [`HeaderPolicy`].
pub fn section_menu_with(text: &str, policy: HeaderPolicy) -> Vec<MenuSection> {
    let mut buckets: [Vec<String>; 4] = Default::default();
    let mut current: Option<SectionLabel> = None;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(label) = SectionLabel::classify(line) {
            current = Some(label);
            if policy == HeaderPolicy::KeepRemainder
                && let Some(rest) = header_remainder(line)
            {
                buckets[label.index()].push(rest.to_string());
            }
            continue;
        }

        if let Some(label) = current
            && !line.starts_with('#')
        {
            buckets[label.index()].push(line.to_string());
        }
    }

    SectionLabel::ALL
        .into_iter()
        .zip(buckets)
        .filter(|(_, items)| !items.is_empty())
        .map(|(label, items)| MenuSection { label, items })
        .collect()
}

/// Text after a header's first `:`, without markdown emphasis.
///
/// Only a keyword before the colon makes the line a header with content.
/// When the keyword sits after the colon ("Samosa: with sweet chutney"), or
/// the remainder would itself read as a header, nothing is kept.
fn header_remainder(line: &str) -> Option<&str> {
    let (head, rest) = line.split_once(':')?;
    SectionLabel::classify(head)?;
    let rest = rest.trim_matches(|c: char| c == '*' || c == '_' || c.is_whitespace());
    (!rest.is_empty() && SectionLabel::classify(rest).is_none()).then_some(rest)
}

/// Render sections as markdown: a `###` heading per section and a `•`
/// bullet per item.
pub fn render_sections(sections: &[MenuSection]) -> String {
    sections
        .iter()
        .map(|section| {
            let items: Vec<String> = section.items.iter().map(|i| format!("• {i}")).collect();
            format!("### {}\n{}", section.label.title(), items.join("\n"))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
