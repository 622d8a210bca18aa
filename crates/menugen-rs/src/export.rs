//! Plain-text download artifact.
//!
//! The export is built from the raw menu text the model returned, not from
//! the sectioned view, so nothing the sectioner dropped is lost.

use std::path::{Path, PathBuf};

use serde::Serialize;

/// MIME type of the download.
pub const EXPORT_MIME: &str = "text/plain";

/// A downloadable menu file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuExport {
    pub file_name: String,
    pub content: String,
    pub mime: &'static str,
}

impl MenuExport {
    pub fn new(restaurant_name: &str, menu_text: &str) -> Self {
        Self {
            file_name: export_file_name(restaurant_name),
            content: export_content(restaurant_name, menu_text),
            mime: EXPORT_MIME,
        }
    }

    /// Write the file into `dir` and return its path.
    ///
    /// Path separators in the file name are replaced so the file always
    /// lands directly inside `dir`.
    pub fn write_to(&self, dir: &Path) -> std::io::Result<PathBuf> {
        let path = dir.join(self.file_name.replace(['/', '\\'], "_"));
        std::fs::write(&path, &self.content)?;
        Ok(path)
    }
}

/// `<name with spaces as underscores>_menu.txt`
pub fn export_file_name(restaurant_name: &str) -> String {
    format!("{}_menu.txt", restaurant_name.replace(' ', "_"))
}

pub fn export_content(restaurant_name: &str, menu_text: &str) -> String {
    format!("Restaurant: {restaurant_name}\n\n{menu_text}")
}
