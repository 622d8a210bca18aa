//! Axum server setup and router construction.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use menugen_rs::service::MenuGenerator;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::api::{self, AppState};
use crate::page;

/// Build the full axum router.
///
/// The router serves:
/// - The form page at `/`
/// - REST API at `/api/*`
pub fn build_router(generator: Arc<MenuGenerator>) -> Router {
    let app_state = AppState { generator };

    // CORS layer so the API can be driven from a page served elsewhere.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/api/options", get(api::get_options))
        .route("/api/generate", post(api::post_generate))
        .route("/api/generate/name", post(api::post_generate_name))
        .route("/api/download", post(api::post_download))
        .route("/api/cache", get(api::get_cache).delete(api::delete_cache))
        .with_state(app_state);

    Router::new()
        .route("/", get(page::index))
        .merge(api_routes)
        .layer(cors)
}

/// Bind the listener, spawn the server, and return the bound address.
pub async fn start_server(router: Router, bind_addr: SocketAddr) -> std::io::Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let addr = listener.local_addr()?;
    info!(%addr, "Web server listening");

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            error!(error = %e, "Web server stopped");
        }
    });

    Ok(addr)
}
