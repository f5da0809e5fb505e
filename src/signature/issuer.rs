//! Signature issuance.
//!
//! Tokens are opaque random strings over `[A-Za-z0-9]` whose length is drawn
//! uniformly from 78 to 80 characters. They carry no embedded data; their
//! validity is entirely a matter of registry membership.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tracing::debug;

use super::registry::{SignatureRegistry, DEFAULT_SIGNATURE_TTL};

/// Alphabet tokens are drawn from.
pub const SIGNATURE_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Shortest token length.
pub const MIN_SIGNATURE_LEN: usize = 78;

/// Longest token length.
pub const MAX_SIGNATURE_LEN: usize = 80;

/// Generate a random token using `rng`.
pub fn generate_token<R: Rng>(rng: &mut R) -> String {
    let len = rng.gen_range(MIN_SIGNATURE_LEN..=MAX_SIGNATURE_LEN);
    (0..len)
        .map(|_| SIGNATURE_ALPHABET[rng.gen_range(0..SIGNATURE_ALPHABET.len())] as char)
        .collect()
}

/// Mints tokens and registers them with a fixed time-to-live.
#[derive(Clone)]
pub struct SignatureIssuer {
    registry: Arc<SignatureRegistry>,
    ttl: Duration,
}

impl SignatureIssuer {
    /// Create an issuer using the default 10 second TTL.
    pub fn new(registry: Arc<SignatureRegistry>) -> Self {
        Self::with_ttl(registry, DEFAULT_SIGNATURE_TTL)
    }

    /// Create an issuer with a custom TTL.
    pub fn with_ttl(registry: Arc<SignatureRegistry>, ttl: Duration) -> Self {
        Self { registry, ttl }
    }

    /// Time-to-live applied to every issued token.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The registry tokens are written to.
    pub fn registry(&self) -> &Arc<SignatureRegistry> {
        &self.registry
    }

    /// Issue a new token.
    ///
    /// Collisions are not checked; with at least 62^78 possible tokens a
    /// collision would silently replace the older record.
    pub async fn issue(&self) -> String {
        let token = generate_token(&mut rand::thread_rng());
        let record = self.registry.insert(token.clone(), self.ttl).await;
        debug!(
            created_at = record.created_at,
            expires_at = record.expires_at,
            "Issued signature"
        );
        token
    }
}
