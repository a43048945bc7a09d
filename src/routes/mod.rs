//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the transform endpoints and the health check under a
//! single Axum router. Anything else falls through to the static page
//! assets in `STATIC_DIR`.

pub mod transform;

use std::path::PathBuf;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;
const DEFAULT_STATIC_DIR: &str = "static";

/// Router settings read from the environment.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Directory holding the page's static assets (`STATIC_DIR`).
    pub static_dir: PathBuf,
    /// Request body cap in bytes (`MAX_UPLOAD_BYTES`).
    pub max_upload_bytes: usize,
}

impl RouterConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let static_dir = std::env::var("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_STATIC_DIR));
        let max_upload_bytes = std::env::var("MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);
        Self { static_dir, max_upload_bytes }
    }
}

/// Full application router configured from the environment.
pub fn app(state: AppState) -> Router {
    router(state, &RouterConfig::from_env())
}

/// API routes, health check, and static fallback.
pub fn router(state: AppState, config: &RouterConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let static_service = ServeDir::new(&config.static_dir).append_index_html_on_directories(true);

    Router::new()
        .route("/api/transform", post(transform::transform_single))
        .route("/api/transform/wheelz", post(transform::transform_wheel_swap))
        .route("/healthz", get(healthz))
        .fallback_service(static_service)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
