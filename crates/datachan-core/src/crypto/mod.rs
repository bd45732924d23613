// ============================================
// File: crates/datachan-core/src/crypto/mod.rs
// ============================================
//! # Cryptography Module
//!
//! ## Creation Reason
//! Groups everything that touches key material for the data channel,
//! using the audited RustCrypto AES-GCM implementation.
//!
//! ## Main Functionality
//!
//! ### Submodules
//! - [`suite`]: `CipherSuite` registry (AES-128/192/256-GCM)
//! - [`keys`]: `SecretBytes`, `DirectionKeys`, `SessionKeys`
//! - [`nonce`]: `DirectionSalt` derivation and nonce construction
//! - [`engine`]: `GcmEngine`, the binding to the GCM primitive
//! - [`aead`]: `AeadDirectionContext`, seal/open per direction
//!
//! ## Transport Phase
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  salt_key[0..8] ──► DirectionSalt (once per key install)    │
//! │                                                             │
//! │  packet_id (BE) ‖ DirectionSalt ──► 12-byte nonce            │
//! │                                                             │
//! │  cipher_key + nonce + AD ──► AES-GCM ──► tag ‖ ciphertext    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - NEVER roll your own crypto; the engine is a thin adapter only
//! - ALL key and salt buffers implement Zeroize
//! - Encrypt and decrypt state never share anything but the suite
//!
//! ## Last Modified
//! v0.1.0 - Initial crypto implementation

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod aead;
pub mod engine;
pub mod keys;
pub mod nonce;
pub mod suite;

// Re-export primary types at module level
pub use aead::AeadDirectionContext;
pub use engine::GcmEngine;
pub use keys::{DirectionKeys, SecretBytes, SessionKeys};
pub use nonce::DirectionSalt;
pub use suite::{CipherSuite, GcmCipher};

// ============================================
// Constants
// ============================================

/// GCM nonce length in bytes.
pub const GCM_IV_SIZE: usize = 12;

/// GCM authentication tag length in bytes.
pub const GCM_TAG_SIZE: usize = 16;

/// Bytes of the nonce taken by the packet id.
pub const NONCE_PACKET_ID_SIZE: usize = 4;

/// Bytes of the nonce taken by the direction salt.
pub const DIRECTION_SALT_SIZE: usize = GCM_IV_SIZE - NONCE_PACKET_ID_SIZE;

// ============================================
// Direction
// ============================================

/// One half of a duplex data channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Outbound: packets this endpoint seals.
    Encrypt,
    /// Inbound: packets this endpoint opens.
    Decrypt,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encrypt => f.write_str("encrypt"),
            Self::Decrypt => f.write_str("decrypt"),
        }
    }
}
