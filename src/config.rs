//! Configuration management for Pixel Gateway.
//!
//! This module provides a configuration system that supports:
//! - Command-line arguments via clap
//! - Environment variables
//! - Sensible defaults for all settings
//!
//! # Environment Variables
//!
//! - `HOST` - Server bind address (default: 0.0.0.0)
//! - `PORT` - Server port (default: 3000)
//! - `API_KEYS` - Accepted API keys, comma-separated (default: built-in development key)
//! - `FILLER_KEYS` - Number of random undisclosed keys to add (default: 0)
//! - `IMAGES_DIR` - Directory generated images are written to (default: images)
//! - `PUBLIC_DIR` - Directory of static assets (default: public)
//! - `SIGNATURE_TTL_MS` - Signature time-to-live in milliseconds (default: 10000)
//! - `SWEEP_INTERVAL_SECS` - Expired signature sweep period (default: 30)
//! - `MAX_IMAGES` - Generated images kept on disk (default: 1000)
//! - `RENDER_COLOR` - Paint the prompt color instead of the fixed placeholder
//! - `CORS_ORIGINS` - Allowed CORS origins, comma-separated (default: any)

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::images::DEFAULT_MAX_IMAGES;
use crate::keys::DEFAULT_API_KEY;
use crate::signature::{DEFAULT_SIGNATURE_TTL, DEFAULT_SWEEP_INTERVAL};

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default directory for generated images.
pub const DEFAULT_IMAGES_DIR: &str = "images";

/// Default directory for static assets.
pub const DEFAULT_PUBLIC_DIR: &str = "public";

// =============================================================================
// CLI Arguments
// =============================================================================

/// Pixel Gateway - short-lived signatures and placeholder images.
///
/// Clients trade an API key for a signature at `/auth`, then redeem the
/// signature at `/generate_image` within its time-to-live.
#[derive(Parser, Debug, Clone)]
#[command(name = "pixel-gateway")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "PORT")]
    pub port: u16,

    // =========================================================================
    // Authentication Configuration
    // =========================================================================
    /// Accepted API keys (comma-separated).
    ///
    /// If not specified, the built-in development key is accepted.
    #[arg(long = "api-key", env = "API_KEYS", value_delimiter = ',')]
    pub api_keys: Vec<String>,

    /// Number of random, undisclosed filler keys to add to the key store.
    #[arg(long, default_value_t = 0, env = "FILLER_KEYS")]
    pub filler_keys: usize,

    /// Signature time-to-live in milliseconds.
    #[arg(long, default_value_t = DEFAULT_SIGNATURE_TTL.as_millis() as u64, env = "SIGNATURE_TTL_MS")]
    pub signature_ttl_ms: u64,

    /// Period in seconds between sweeps of expired signatures.
    #[arg(long, default_value_t = DEFAULT_SWEEP_INTERVAL.as_secs(), env = "SWEEP_INTERVAL_SECS")]
    pub sweep_interval_secs: u64,

    // =========================================================================
    // Storage Configuration
    // =========================================================================
    /// Directory generated images are written to (created if missing).
    #[arg(long, default_value = DEFAULT_IMAGES_DIR, env = "IMAGES_DIR")]
    pub images_dir: PathBuf,

    /// Directory of static assets served for unmatched paths.
    #[arg(long, default_value = DEFAULT_PUBLIC_DIR, env = "PUBLIC_DIR")]
    pub public_dir: PathBuf,

    /// Maximum number of generated images kept on disk.
    ///
    /// The oldest image is deleted once the limit is exceeded.
    #[arg(long, default_value_t = DEFAULT_MAX_IMAGES, env = "MAX_IMAGES")]
    pub max_images: usize,

    /// Paint the prompt-derived color instead of writing the fixed placeholder.
    #[arg(long, default_value_t = false, env = "RENDER_COLOR")]
    pub render_color: bool,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.api_keys.iter().any(|k| k.is_empty()) {
            return Err("API keys must not be empty. Check --api-key or API_KEYS".to_string());
        }

        if self.signature_ttl_ms == 0 {
            return Err("signature_ttl_ms must be greater than 0".to_string());
        }

        if self.sweep_interval_secs == 0 {
            return Err("sweep_interval_secs must be greater than 0".to_string());
        }

        if self.max_images == 0 {
            return Err("max_images must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Whether no API key was configured and the development key is in use.
    pub fn uses_default_api_key(&self) -> bool {
        self.api_keys.is_empty()
    }

    /// The configured API keys, or the development key when none are set.
    pub fn api_keys_or_default(&self) -> Vec<String> {
        if self.uses_default_api_key() {
            vec![DEFAULT_API_KEY.to_string()]
        } else {
            self.api_keys.clone()
        }
    }

    /// Signature time-to-live.
    pub fn signature_ttl(&self) -> Duration {
        Duration::from_millis(self.signature_ttl_ms)
    }

    /// Expired signature sweep period.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

// =============================================================================
// Tests
// =============================================================================
