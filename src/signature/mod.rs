//! Short-lived signatures.
//!
//! A client trades a valid API key for a signature at `/auth`, then presents
//! that signature to `/generate_image` within its time-to-live.
//!
//! ```text
//! ┌──────────────┐   insert   ┌──────────────────────┐   sweep   ┌──────────┐
//! │   Issuer     │ ─────────► │  SignatureRegistry   │ ◄──────── │ Janitor  │
//! └──────────────┘            └──────────────────────┘           └──────────┘
//!                                        ▲
//!                                        │ validate (evicts on expiry)
//!                               ┌────────┴────────┐
//!                               │  /generate_image │
//!                               └─────────────────┘
//! ```
//!
//! # Components
//!
//! - [`SignatureRegistry`]: token → [`SignatureRecord`] table with expiry checks
//! - [`SignatureIssuer`]: random token generation and registration
//! - [`Janitor`]: periodic background removal of expired records

mod issuer;
mod janitor;
mod registry;

pub use issuer::{
    generate_token, SignatureIssuer, MAX_SIGNATURE_LEN, MIN_SIGNATURE_LEN, SIGNATURE_ALPHABET,
};
pub use janitor::{Janitor, JanitorHandle, DEFAULT_SWEEP_INTERVAL};
pub use registry::{SignatureRecord, SignatureRegistry, DEFAULT_SIGNATURE_TTL};
