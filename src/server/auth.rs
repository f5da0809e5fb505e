//! API key authentication for Pixel Gateway.
//!
//! Every protected route passes through [`auth_middleware`], which reads the
//! raw `Authorization` header and checks it against the [`KeyStore`]. The
//! header value is the key itself; no scheme prefix such as `Bearer` is
//! stripped.
//!
//! On success the key is attached to the request as an [`ApiKey`] extension
//! so handlers can attribute their work. On failure the request is answered
//! with `401 {"error": "Unauthorized: Invalid API key"}` and never reaches the
//! handler.

use std::fmt;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::keys::KeyStore;

/// Number of leading key characters shown in logs.
const REDACTED_PREFIX_LEN: usize = 8;

/// The API key that authenticated the current request.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// The full key.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A short prefix of the key, safe to log.
    pub fn redacted(&self) -> String {
        let prefix: String = self.0.chars().take(REDACTED_PREFIX_LEN).collect();
        format!("{}…", prefix)
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiKey").field(&self.redacted()).finish()
    }
}

/// Axum middleware rejecting requests without a valid API key.
///
/// # Example
///
/// ```ignore
/// use axum::{Router, middleware, routing::post};
/// use pixel_gateway::server::auth::auth_middleware;
///
/// let app = Router::new()
///     .route("/auth", post(auth_handler))
///     .layer(middleware::from_fn_with_state(keys, auth_middleware));
/// ```
pub async fn auth_middleware(
    State(keys): State<Arc<KeyStore>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let credential = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .filter(|value| keys.is_valid(value))
        .map(str::to_owned)
        .ok_or(ApiError::Unauthorized)?;

    request.extensions_mut().insert(ApiKey(credential));

    Ok(next.run(request).await)
}
