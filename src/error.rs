use thiserror::Error;

/// Errors produced when redeeming a signature against the registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    /// Token is unknown (never issued, already swept, or evicted on expiry)
    #[error("Invalid signature")]
    InvalidSignature,

    /// Token was known but its time-to-live has elapsed
    #[error("Signature expired")]
    SignatureExpired {
        /// When the signature expired (epoch milliseconds)
        expired_at: u64,
        /// Time of the failed redemption (epoch milliseconds)
        current_time: u64,
    },
}

/// Errors that can occur while rendering or storing a generated image
#[derive(Debug, Error)]
pub enum ImageError {
    /// Filesystem error while writing or removing an image
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Renderer failed to encode the image bytes
    #[error("Encode error: {message}")]
    Encode { message: String },
}

/// Errors surfaced at the HTTP boundary.
///
/// Every variant is recovered into a status code and a JSON error body; none
/// of them terminate the process.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or unknown API key
    #[error("Unauthorized: Invalid API key")]
    Unauthorized,

    /// Signature absent from the request or unknown to the registry
    #[error("Invalid signature")]
    InvalidSignature,

    /// Signature known but stale (evicted on detection)
    #[error("Signature expired")]
    SignatureExpired,

    /// Generation request without a prompt
    #[error("Prompt is required")]
    MissingPrompt,

    /// Request body is present but not a JSON object
    #[error("Malformed JSON body")]
    MalformedBody,

    /// The generated image could not be written
    #[error("Failed to store image")]
    StorageFailure(#[source] ImageError),
}

impl From<SignatureError> for ApiError {
    fn from(err: SignatureError) -> Self {
        match err {
            SignatureError::InvalidSignature => ApiError::InvalidSignature,
            SignatureError::SignatureExpired { .. } => ApiError::SignatureExpired,
        }
    }
}

impl From<ImageError> for ApiError {
    fn from(err: ImageError) -> Self {
        ApiError::StorageFailure(err)
    }
}
