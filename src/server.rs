//! Router assembly and the HTTP server loop.

use crate::config::Config;
use crate::content::ContentClient;
use crate::middleware::locale_redirect;
use crate::widgets::image::{PLACEHOLDER_IMAGE, PLACEHOLDER_SVG};
use crate::{api, pages, sitemap};
use anyhow::{Context, Result};
use axum::{
    extract::Request, http::header, middleware, response::IntoResponse, routing::get, Router,
    ServiceExt,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{normalize_path::NormalizePath, trace::TraceLayer};
use tracing::info;

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub content: ContentClient,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let content = ContentClient::new(&config);
        Self {
            config: Arc::new(config),
            content,
        }
    }
}

async fn placeholder_svg() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "image/svg+xml"),
            (header::CACHE_CONTROL, "public, max-age=86400"),
        ],
        PLACEHOLDER_SVG,
    )
}

/// The full application. Trailing slashes are trimmed before routing, so
/// `/zh/` is served as `/zh`.
pub type App = NormalizePath<Router>;

pub fn build_router(state: AppState) -> App {
    let router = Router::new()
        .merge(api::router())
        .merge(pages::router())
        .route("/sitemap.xml", get(sitemap::sitemap_xml))
        .route("/robots.txt", get(sitemap::robots_txt))
        .route(PLACEHOLDER_IMAGE, get(placeholder_svg))
        .fallback(pages::not_found)
        .layer(middleware::from_fn(locale_redirect))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    NormalizePath::trim_trailing_slash(router)
}

/// Bind to `0.0.0.0:<port>` and serve until the process is stopped.
pub async fn serve(config: Config) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = build_router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .await
        .context("Server error")?;
    Ok(())
}
