//! Browser front end for the restaurant and menu generator.
//!
//! `menugen-web` serves a single-page form and a small REST API on top of
//! [`MenuGenerator`]. The page collects a country and a style, calls
//! `POST /api/generate`, renders the name and the sectioned menu, and offers
//! the raw menu as a text download through `POST /api/download`.
//!
//! # Quick start
//!
//! ```ignore
//! use std::sync::Arc;
//! use menugen_rs::prelude::*;
//! use menugen_web::{WebConfig, spawn_web};
//!
//! let generator = Arc::new(MenuGenerator::new(
//!     Arc::new(FakeGenerator::restaurant("Spice Route", "Starters\nSamosa")),
//!     Arc::new(ResponseCache::default()),
//! ));
//!
//! let addr = spawn_web(generator, WebConfig::default()).await?;
//! println!("Web UI: http://{addr}");
//! ```
//!
//! # Endpoints
//!
//! | Route | Description |
//! |-------|-------------|
//! | `GET /` | The form page |
//! | `GET /api/options` | Preset countries and styles |
//! | `POST /api/generate` | Name, raw menu, sections, download descriptor |
//! | `POST /api/generate/name` | Name only (warms the cache for the full request) |
//! | `POST /api/download` | The menu as a `text/plain` attachment |
//! | `GET /api/cache` | Cache statistics |
//! | `DELETE /api/cache` | Drop all cached generations |
//!
//! One [`MenuGenerator`] (and so one response cache) is shared by every
//! request the server handles.

mod api;
mod page;
mod server;

pub use api::{
    DownloadInfo, DownloadRequest, ErrorBody, GenerateRequest, GenerateResponse, NameResponse,
    OptionsResponse, PresetOption, SectionView,
};

use std::net::SocketAddr;
use std::sync::Arc;

use menugen_rs::service::MenuGenerator;

/// Configuration for the web server.
pub struct WebConfig {
    /// Address to bind to. Default: `127.0.0.1:3001`.
    pub bind_addr: SocketAddr,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3001)),
        }
    }
}

/// Spawn the web server on a Tokio task and return the bound address.
///
/// The server runs until the Tokio runtime shuts down. Binding to port 0
/// picks a free port.
pub async fn spawn_web(
    generator: Arc<MenuGenerator>,
    config: WebConfig,
) -> std::io::Result<SocketAddr> {
    let router = server::build_router(generator);
    server::start_server(router, config.bind_addr).await
}
