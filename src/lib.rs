//! # Pixel Gateway
//!
//! A small HTTP service that issues short-lived signatures and serves
//! placeholder images for text prompts.
//!
//! ## Flow
//!
//! 1. `POST /auth` with `Authorization: <api key>` returns `{"signature": "..."}`.
//! 2. `POST /generate_image` with the same header and
//!    `{"signature": "...", "prompt": "..."}` returns the URL path of a 1×1 PNG.
//! 3. `GET /images/<filename>` serves the file.
//!
//! Signatures live for 10 seconds and may be redeemed repeatedly until they
//! expire. A background janitor removes expired signatures every 30 seconds.
//!
//! ## Architecture
//!
//! - [`clock`] - Wall-clock abstraction used for expiry
//! - [`keys`] - Fixed set of accepted API keys
//! - [`signature`] - Signature registry, issuer and janitor
//! - [`images`] - Prompt color, filenames, rendering and retention
//! - [`server`] - Axum-based HTTP server and routes
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use pixel_gateway::{
//!     create_router, AppState, ImageStore, KeyStore, PlaceholderRenderer, RouterConfig,
//!     SignatureIssuer, SignatureRegistry, SystemClock,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let clock = Arc::new(SystemClock);
//!     let registry = Arc::new(SignatureRegistry::new(clock.clone()));
//!     let issuer = SignatureIssuer::new(registry);
//!     let images = ImageStore::new("images", Arc::new(PlaceholderRenderer), clock, 1000);
//!     let state = AppState::new(KeyStore::new(["my-key"]), issuer, images);
//!
//!     let router = create_router(state, RouterConfig::new());
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod images;
pub mod keys;
pub mod server;
pub mod signature;

// Re-export commonly used types
pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use config::Config;
pub use error::{ApiError, ImageError, SignatureError};
pub use images::{
    prompt_color, sanitize_prompt, Color, GeneratedImage, ImageRenderer, ImageStore,
    PlaceholderRenderer, SolidColorRenderer, IMAGES_URL_PREFIX, PLACEHOLDER_PNG,
};
pub use keys::{KeyStore, DEFAULT_API_KEY};
pub use server::{
    auth_middleware, create_router, ApiKey, AppState, AuthResponse, ErrorResponse,
    GenerateImageRequest, HealthResponse, RouterConfig,
};
pub use signature::{
    generate_token, Janitor, JanitorHandle, SignatureIssuer, SignatureRecord, SignatureRegistry,
    DEFAULT_SIGNATURE_TTL, DEFAULT_SWEEP_INTERVAL,
};
