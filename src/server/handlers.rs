//! HTTP request handlers for the Pixel Gateway API.
//!
//! # Endpoints
//!
//! - `POST /auth` - Trade an API key for a short-lived signature
//! - `POST /generate_image` - Redeem a signature to generate an image
//! - `GET /health` - Health check endpoint

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Extension, State},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::error::ApiError;
use crate::images::ImageStore;
use crate::keys::KeyStore;
use crate::signature::{SignatureIssuer, SignatureRegistry};

use super::auth::ApiKey;

// =============================================================================
// Application State
// =============================================================================

/// Shared application state.
///
/// Built once at startup and passed to all handlers via Axum's State extractor.
#[derive(Clone)]
pub struct AppState {
    /// Accepted API keys
    pub keys: Arc<KeyStore>,

    /// Live signatures
    pub registry: Arc<SignatureRegistry>,

    /// Mints new signatures into `registry`
    pub issuer: SignatureIssuer,

    /// Writes generated images
    pub images: Arc<ImageStore>,
}

impl AppState {
    /// Create application state around an issuer, sharing its registry.
    pub fn new(keys: KeyStore, issuer: SignatureIssuer, images: ImageStore) -> Self {
        Self {
            keys: Arc::new(keys),
            registry: Arc::clone(issuer.registry()),
            issuer,
            images: Arc::new(images),
        }
    }
}

// =============================================================================
// Request / Response Types
// =============================================================================

/// Body of `POST /generate_image`.
///
/// Fields are kept as raw JSON values so that a field of the wrong type is
/// judged at the step that needs it rather than failing the whole body.
#[derive(Debug, Default)]
pub struct GenerateImageRequest {
    /// Signature obtained from `/auth`
    pub signature: Option<Value>,

    /// Text prompt
    pub prompt: Option<Value>,
}

impl GenerateImageRequest {
    /// Parse a request body. An empty body is treated as `{}`.
    ///
    /// Anything other than a JSON object is rejected as malformed.
    pub fn from_body(body: &[u8]) -> Result<Self, ApiError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        let value: Value = serde_json::from_slice(body).map_err(|e| {
            debug!("Rejected generation body: {}", e);
            ApiError::MalformedBody
        })?;
        match value {
            Value::Object(mut fields) => Ok(Self {
                signature: fields.remove("signature"),
                prompt: fields.remove("prompt"),
            }),
            other => {
                debug!("Rejected generation body: not an object: {}", other);
                Err(ApiError::MalformedBody)
            }
        }
    }

    /// The signature, if it is a non-empty string.
    pub fn signature(&self) -> Option<&str> {
        non_empty_str(self.signature.as_ref())
    }

    /// The prompt, if it is a non-empty string.
    pub fn prompt(&self) -> Option<&str> {
        non_empty_str(self.prompt.as_ref())
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Whether the request declares a JSON body.
///
/// Bodies sent with any other content type are ignored and treated as `{}`.
pub fn has_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
}

/// Response from `POST /auth`.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Newly issued signature
    pub signature: String,
}

/// JSON error response returned for all error conditions.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

// =============================================================================
// Error Mapping
// =============================================================================

impl ApiError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized | ApiError::InvalidSignature | ApiError::SignatureExpired => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::MissingPrompt | ApiError::MalformedBody => StatusCode::BAD_REQUEST,
            ApiError::StorageFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Convert ApiError to HTTP response.
///
/// - 5xx errors are logged at ERROR level with the underlying cause
/// - rejected credentials and signatures are logged at WARN level
/// - other client errors are logged at DEBUG level
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        match &self {
            ApiError::StorageFailure(cause) => {
                error!(status = status.as_u16(), "Server error: {}: {}", message, cause);
            }
            ApiError::Unauthorized | ApiError::InvalidSignature => {
                warn!(status = status.as_u16(), "Authentication failed: {}", message);
            }
            _ => {
                debug!(status = status.as_u16(), "Client error: {}", message);
            }
        }

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Issue a signature.
///
/// # Endpoint
///
/// `POST /auth` with header `Authorization: <api key>`
///
/// # Response
///
/// `200 OK` with JSON body `{"signature": "<token>"}`. Rejected keys never
/// reach this handler; the auth middleware answers them with `401`.
pub async fn auth_handler(
    State(state): State<AppState>,
    Extension(key): Extension<ApiKey>,
) -> Json<AuthResponse> {
    let signature = state.issuer.issue().await;
    info!(api_key = %key.redacted(), "Signature issued");
    Json(AuthResponse { signature })
}

/// Generate an image for a prompt.
///
/// # Endpoint
///
/// `POST /generate_image` with header `Authorization: <api key>` and JSON body
/// `{"signature": "<token>", "prompt": "<text>"}`
///
/// # Response
///
/// `200 OK` with the image URL path as a bare JSON string, e.g.
/// `"/images/1700000000000_a_red_fox.png"`.
///
/// # Errors
///
/// - `401 Unauthorized`: `Invalid signature` or `Signature expired`
/// - `400 Bad Request`: `Prompt is required` or `Malformed JSON body`
///
/// A body not sent as `application/json` is ignored, which reads as a
/// missing signature.
/// - `500 Internal Server Error`: the image could not be written
pub async fn generate_image_handler(
    State(state): State<AppState>,
    Extension(key): Extension<ApiKey>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<String>, ApiError> {
    let request = if has_json_content_type(&headers) {
        GenerateImageRequest::from_body(&body)?
    } else {
        GenerateImageRequest::default()
    };

    let signature = request.signature().ok_or(ApiError::InvalidSignature)?;
    state.registry.validate(signature).await?;

    let prompt = request.prompt().ok_or(ApiError::MissingPrompt)?;

    let image = state.images.generate(prompt).await?;
    info!(
        api_key = %key.redacted(),
        path = %image.url_path,
        color = %image.color,
        "Image generated"
    );

    Ok(Json(image.url_path))
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// Tests
// =============================================================================
