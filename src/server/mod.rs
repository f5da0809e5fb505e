//! HTTP server layer for Pixel Gateway.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │            POST /auth          POST /generate_image             │
//! │                                                                 │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────────┐  │
//! │  │  handlers   │  │    auth     │  │        routes           │  │
//! │  │ (requests)  │  │  (API key)  │  │  (router config)        │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod handlers;
pub mod routes;

pub use auth::{auth_middleware, ApiKey};
pub use handlers::{
    auth_handler, generate_image_handler, health_handler, AppState, AuthResponse, ErrorResponse,
    GenerateImageRequest, HealthResponse,
};
pub use routes::{create_router, RouterConfig};
