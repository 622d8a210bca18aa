//! REST API endpoint handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use menugen_rs::cache::CacheStats;
use menugen_rs::export::MenuExport;
use menugen_rs::menu::{MenuSection, SectionLabel};
use menugen_rs::prompt::{
    OTHER_COUNTRY, POPULAR_COUNTRIES, RESTAURANT_STYLES, country_from_label, strip_label_icon,
};
use menugen_rs::service::{GenerateError, GeneratedRestaurant, MenuGenerator};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Shared application state passed to all handlers via axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<MenuGenerator>,
}

/// JSON error body for 4xx/5xx responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

// ── Options ──────────────────────────────────────────────────────────

/// A preset choice: the label shown in the select, and the value sent back.
#[derive(Debug, Serialize, Deserialize)]
pub struct PresetOption {
    pub label: String,
    pub value: String,
}

impl PresetOption {
    fn from_label(label: &str) -> Self {
        Self {
            label: label.to_string(),
            value: strip_label_icon(label).to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OptionsResponse {
    pub countries: Vec<PresetOption>,
    pub styles: Vec<PresetOption>,
    /// Country value that asks for free-text input.
    pub other: String,
}

/// GET /api/options: Preset countries and styles for the form.
pub async fn get_options() -> Json<OptionsResponse> {
    Json(OptionsResponse {
        countries: POPULAR_COUNTRIES
            .iter()
            .map(|l| PresetOption::from_label(l))
            .collect(),
        styles: RESTAURANT_STYLES
            .iter()
            .map(|l| PresetOption::from_label(l))
            .collect(),
        other: OTHER_COUNTRY.to_string(),
    })
}

// ── Generate ─────────────────────────────────────────────────────────

/// Request body for POST /api/generate.
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub style: String,
}

/// One menu section as the page renders it.
#[derive(Debug, Serialize, Deserialize)]
pub struct SectionView {
    pub label: SectionLabel,
    pub title: String,
    pub items: Vec<String>,
}

impl From<MenuSection> for SectionView {
    fn from(section: MenuSection) -> Self {
        Self {
            label: section.label,
            title: section.label.title().to_string(),
            items: section.items,
        }
    }
}

/// What the page needs to offer the download.
#[derive(Debug, Serialize, Deserialize)]
pub struct DownloadInfo {
    pub file_name: String,
    pub mime: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub country: String,
    pub style: String,
    pub name: String,
    pub menu_text: String,
    pub sections: Vec<SectionView>,
    pub download: DownloadInfo,
}

impl From<GeneratedRestaurant> for GenerateResponse {
    fn from(restaurant: GeneratedRestaurant) -> Self {
        let export = restaurant.export();
        Self {
            download: DownloadInfo {
                file_name: export.file_name,
                mime: export.mime.to_string(),
            },
            country: restaurant.country,
            style: restaurant.style,
            name: restaurant.name,
            menu_text: restaurant.menu_text,
            sections: restaurant.sections.into_iter().map(Into::into).collect(),
        }
    }
}

/// POST /api/generate: Generate a name and menu.
///
/// Preset labels are accepted as well as plain values. Returns 200 with the
/// result, 422 if a field is empty (no generation is attempted), or 502 if
/// the generation service failed.
pub async fn post_generate(
    State(app): State<AppState>,
    Json(body): Json<GenerateRequest>,
) -> Response {
    let country = country_from_label(&body.country);
    let style = strip_label_icon(&body.style);

    let result = app
        .generator
        .generate_with_progress(country, style, |phase| {
            info!(country, style, percent = phase.percent(), "{}", phase.message())
        })
        .await;

    match result {
        Ok(restaurant) => Json(GenerateResponse::from(restaurant)).into_response(),
        Err(e) => generate_error_response(country, style, e),
    }
}

/// Response body for POST /api/generate/name.
#[derive(Debug, Serialize, Deserialize)]
pub struct NameResponse {
    pub name: String,
}

/// POST /api/generate/name: Generate only the name.
///
/// Takes the same body and returns the same error statuses as
/// `/api/generate`. The page calls it first so it can report the menu step
/// once the name is back; the follow-up `/api/generate` reads the name from
/// the cache.
pub async fn post_generate_name(
    State(app): State<AppState>,
    Json(body): Json<GenerateRequest>,
) -> Response {
    let country = country_from_label(&body.country);
    let style = strip_label_icon(&body.style);

    match app.generator.generate_name(country, style).await {
        Ok(name) => Json(NameResponse { name }).into_response(),
        Err(e) => generate_error_response(country, style, e),
    }
}

fn generate_error_response(country: &str, style: &str, error: GenerateError) -> Response {
    match error {
        e @ GenerateError::MissingInput(_) => {
            error_response(StatusCode::UNPROCESSABLE_ENTITY, format!("⚠️ {e}"))
        }
        GenerateError::Unavailable(e) => {
            warn!(country, style, error = %e, "Generation request failed");
            error_response(StatusCode::BAD_GATEWAY, e.to_string())
        }
    }
}

// ── Download ─────────────────────────────────────────────────────────

/// Request body for POST /api/download.
#[derive(Debug, Serialize, Deserialize)]
pub struct DownloadRequest {
    pub name: String,
    pub menu_text: String,
}

/// POST /api/download: The raw menu as a plain-text attachment.
pub async fn post_download(Json(body): Json<DownloadRequest>) -> Response {
    let export = MenuExport::new(&body.name, &body.menu_text);
    let disposition = content_disposition(&export.file_name);
    (
        [
            (
                header::CONTENT_TYPE,
                format!("{}; charset=utf-8", export.mime),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        export.content,
    )
        .into_response()
}

/// `attachment` disposition with an ASCII fallback name and the exact name
/// percent-encoded in `filename*`.
fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let encoded: String = file_name
        .bytes()
        .map(|b| {
            if b.is_ascii_alphanumeric() || b"-._~".contains(&b) {
                (b as char).to_string()
            } else {
                format!("%{b:02X}")
            }
        })
        .collect();
    format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}

// ── Cache ────────────────────────────────────────────────────────────

/// GET /api/cache: Cache statistics.
pub async fn get_cache(State(app): State<AppState>) -> Json<CacheStats> {
    Json(app.generator.cache().stats())
}

/// DELETE /api/cache: Drop all cached generations. Returns 204.
pub async fn delete_cache(State(app): State<AppState>) -> StatusCode {
    app.generator.cache().clear();
    info!("Generation cache cleared");
    StatusCode::NO_CONTENT
}
