//! The single-page form.

use axum::response::Html;

const INDEX_HTML: &str = include_str!("../assets/index.html");

/// GET /: The form page. All data is fetched from `/api/*`.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
