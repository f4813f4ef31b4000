//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both
//! the production server and integration tests.

use axum::{
    extract::State,
    http::{header::CACHE_CONTROL, HeaderValue},
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::api;
use crate::assets::AssetLoader;
use crate::error::ApiError;
use crate::models::AppConfig;
use crate::services::{FileWatcher, PortfolioPipeline};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<PortfolioPipeline>,
    /// Site directory for static files, if one is configured
    pub site_dir: Option<PathBuf>,
    /// Inject the dev reload script into served pages
    pub live_reload: bool,
}

/// Create application state from an asset loader.
pub fn create_app_state(asset_loader: Arc<AssetLoader>) -> AppState {
    let config = Arc::new(AppConfig::load_from_assets(&asset_loader));
    create_app_state_with_config(asset_loader, config)
}

/// Create application state with an explicit configuration.
pub fn create_app_state_with_config(
    asset_loader: Arc<AssetLoader>,
    config: Arc<AppConfig>,
) -> AppState {
    let site_dir = asset_loader.site_dir().map(PathBuf::from);
    let pipeline = Arc::new(PortfolioPipeline::new(config, asset_loader));
    tracing::info!(source = %pipeline.source_description(), "Portfolio pipeline ready");

    AppState {
        pipeline,
        site_dir,
        live_reload: false,
    }
}

/// Build the router with all endpoints and middleware.
///
/// This is the core router used by both production and tests. The page is
/// rendered on every request; everything else comes from the site directory.
pub fn build_router(state: AppState) -> Router {
    let site_dir = state.site_dir.clone();

    let router = Router::new()
        .route("/", get(handle_page))
        .route("/index.html", get(handle_page))
        // Health check
        .route("/health", get(|| async { "OK" }));

    let router = match site_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router.fallback(handle_not_found),
    };

    router
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // Every request renders fresh data
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static("no-cache"),
        ))
}

/// Routes only mounted by `folio dev`, nested under `/dev`.
pub fn build_dev_router(file_watcher: Arc<FileWatcher>) -> Router {
    Router::new()
        .route("/events", get(api::handle_events))
        .with_state(api::DevState { file_watcher })
}

async fn handle_page(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    api::handle_page(&state.pipeline, state.live_reload).await
}

async fn handle_not_found() -> impl IntoResponse {
    ApiError::NotFound
}
