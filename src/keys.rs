//! API key store.
//!
//! The set of accepted credentials is fixed when the server starts. Keys never
//! expire and are compared by exact string match.

use std::collections::HashSet;

use rand::RngCore;
use subtle::ConstantTimeEq;

/// Development key accepted when no key is configured.
pub const DEFAULT_API_KEY: &str = "c0957e34a11786192e8819a7d4faef725c3a0becf05716823b30e37111196e92ba1953a695dddd761cce8abbffefce40da8059d06aa651a02f9cc3322a7d1e0b";

/// Length in bytes of a generated filler key (128 hex characters).
const FILLER_KEY_BYTES: usize = 64;

/// Immutable set of accepted API keys.
#[derive(Debug, Clone)]
pub struct KeyStore {
    keys: HashSet<String>,
}

impl KeyStore {
    /// Create a store from an explicit set of keys.
    pub fn new<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Add `count` random hex keys to the store.
    ///
    /// Filler keys are never disclosed, so nobody can authenticate with them.
    pub fn with_filler_keys(mut self, count: usize) -> Self {
        let mut rng = rand::thread_rng();
        for _ in 0..count {
            let mut bytes = [0u8; FILLER_KEY_BYTES];
            rng.fill_bytes(&mut bytes);
            self.keys.insert(hex::encode(bytes));
        }
        self
    }

    /// Whether `credential` is one of the accepted keys.
    ///
    /// Each candidate is compared in constant time.
    pub fn is_valid(&self, credential: &str) -> bool {
        let presented = credential.as_bytes();
        self.keys
            .iter()
            .fold(false, |found, key| found | bool::from(key.as_bytes().ct_eq(presented)))
    }

    /// Number of accepted keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the store accepts no keys at all.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
