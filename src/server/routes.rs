//! Router configuration for Pixel Gateway.
//!
//! This module defines the HTTP routes and applies middleware for
//! authentication, CORS and request tracing.
//!
//! # Route Structure
//!
//! ```text
//! /health                 - Health check (public)
//! /auth                   - Issue a signature (API key)
//! /generate_image         - Generate an image (API key + signature)
//! /images/{filename}      - Generated images (public, static)
//! /*                      - Public assets directory (static fallback)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use pixel_gateway::server::{create_router, AppState, RouterConfig};
//!
//! let state = AppState::new(keys, issuer, images);
//! let config = RouterConfig::new().with_public_dir("public");
//! let router = create_router(state, config);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    handler::HandlerWithoutStateExt,
    http::StatusCode,
    middleware,
    routing::{get, post},
    Router,
};
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::auth::auth_middleware;
use super::handlers::{auth_handler, generate_image_handler, health_handler, AppState};
use crate::images::IMAGES_URL_PREFIX;

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Directory served verbatim for paths no route matches
    pub public_dir: Option<PathBuf>,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RouterConfig {
    /// Create a router configuration.
    ///
    /// By default:
    /// - CORS allows any origin
    /// - No public assets directory is served
    /// - Tracing is enabled
    pub fn new() -> Self {
        Self {
            cors_origins: None,
            public_dir: None,
            enable_tracing: true,
        }
    }

    /// Set specific allowed CORS origins.
    ///
    /// Pass an empty vec to disallow all cross-origin requests.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Serve `dir` for any path not matched by another route.
    pub fn with_public_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.public_dir = Some(dir.into());
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
pub fn create_router(state: AppState, config: RouterConfig) -> Router {
    let cors = build_cors_layer(&config);
    // Methods other than GET/HEAD fall through to 404 rather than 405
    let images = ServeDir::new(state.images.dir())
        .call_fallback_on_method_not_allowed(true)
        .fallback(not_found.into_service());

    // route_layer so unknown paths fall through to 404 instead of 401
    let protected_routes = Router::new()
        .route("/auth", post(auth_handler))
        .route("/generate_image", post(generate_image_handler))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state.keys),
            auth_middleware,
        ))
        .with_state(state);

    let mut router = Router::new()
        .merge(protected_routes)
        .route("/health", get(health_handler))
        .nest_service(IMAGES_URL_PREFIX, images);

    if let Some(ref public_dir) = config.public_dir {
        let public = ServeDir::new(public_dir)
            .call_fallback_on_method_not_allowed(true)
            .fallback(not_found.into_service());
        router = router.fallback_service(public);
    }

    let router = router.layer(cors);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Answer for static paths with no file or an unsupported method.
async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .max_age(Duration::from_secs(86400)); // 24 hours

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => cors,
        Some(origins) => {
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
