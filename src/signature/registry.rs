//! In-memory signature registry.
//!
//! Maps issued tokens to their issuance and expiry timestamps. The registry
//! is the only shared mutable state of the service: the issuer inserts, the
//! validator reads and evicts stale entries, and the janitor sweeps in bulk.
//!
//! # Expiry
//!
//! A record is expired once the current time is strictly greater than its
//! `expires_at`. A redemption at exactly `expires_at` still succeeds.
//!
//! # Reuse
//!
//! Successful validation does not remove the record. A token can be redeemed
//! any number of times until it expires or is swept.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::debug;

use crate::clock::SharedClock;
use crate::error::SignatureError;

/// Default signature time-to-live (10 seconds).
pub const DEFAULT_SIGNATURE_TTL: Duration = Duration::from_secs(10);

// =============================================================================
// Signature Record
// =============================================================================

/// Issuance and expiry timestamps of a signature, in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureRecord {
    /// When the signature was issued
    pub created_at: u64,

    /// When the signature stops being accepted
    pub expires_at: u64,
}

impl SignatureRecord {
    /// Create a record issued at `created_at` that lives for `ttl`.
    pub fn new(created_at: u64, ttl: Duration) -> Self {
        Self {
            created_at,
            expires_at: created_at.saturating_add(ttl.as_millis() as u64),
        }
    }

    /// Whether the record has expired at time `now`.
    pub fn is_expired(&self, now: u64) -> bool {
        now > self.expires_at
    }
}

// =============================================================================
// Signature Registry
// =============================================================================

/// Process-wide table of live signatures.
pub struct SignatureRegistry {
    entries: RwLock<HashMap<String, SignatureRecord>>,
    clock: SharedClock,
}

impl SignatureRegistry {
    /// Create an empty registry reading time from `clock`.
    pub fn new(clock: SharedClock) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// The clock used for expiry decisions.
    pub fn clock(&self) -> &SharedClock {
        &self.clock
    }

    /// Register `token` as issued now with the given time-to-live.
    ///
    /// An existing record under the same token is overwritten.
    pub async fn insert(&self, token: String, ttl: Duration) -> SignatureRecord {
        let record = SignatureRecord::new(self.clock.now_millis(), ttl);
        self.entries.write().await.insert(token, record);
        record
    }

    /// Validate a presented token.
    ///
    /// Unknown tokens fail with [`SignatureError::InvalidSignature`]. Expired
    /// tokens are removed and fail with [`SignatureError::SignatureExpired`];
    /// the check and the removal happen under one write lock, so a later
    /// lookup of the same token reports it as invalid.
    pub async fn validate(&self, token: &str) -> Result<SignatureRecord, SignatureError> {
        let mut entries = self.entries.write().await;

        let record = *entries
            .get(token)
            .ok_or(SignatureError::InvalidSignature)?;

        let now = self.clock.now_millis();
        if record.is_expired(now) {
            entries.remove(token);
            debug!(
                expired_at = record.expires_at,
                current_time = now,
                "Evicted expired signature"
            );
            return Err(SignatureError::SignatureExpired {
                expired_at: record.expires_at,
                current_time: now,
            });
        }

        Ok(record)
    }

    /// Remove every expired record and return how many were removed.
    pub async fn sweep_expired(&self) -> usize {
        let now = self.clock.now_millis();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, record| !record.is_expired(now));
        before - entries.len()
    }

    /// Look up a record without validating it.
    pub async fn get(&self, token: &str) -> Option<SignatureRecord> {
        self.entries.read().await.get(token).copied()
    }

    /// Number of records currently held.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the registry holds no records.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================
