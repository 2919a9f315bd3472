//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `POST /url`          - Create a short URL
//! - `GET  /health`       - Health check: database and cache
//! - `GET  /{short_url}`  - Short code redirect
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api::handlers::{health_handler, redirect_handler, shorten_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Routes and request tracing, without path normalization.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/url", post(shorten_handler))
        .route("/health", get(health_handler))
        .route("/{short_url}", get(redirect_handler))
        .with_state(state)
        .layer(tracing::layer())
}

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(api_router(state))
}
