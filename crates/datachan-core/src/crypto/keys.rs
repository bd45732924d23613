// ============================================
// File: crates/datachan-core/src/crypto/keys.rs
// ============================================
//! # Session Key Material
//!
//! ## Creation Reason
//! Holds the symmetric key material handed over by the key-negotiation
//! layer, with guaranteed zeroing when a buffer is dropped or replaced.
//!
//! ## Main Functionality
//! - `SecretBytes`: heap buffer zeroed on every release path
//! - `DirectionKeys`: cipher key + salt-source key for one direction
//! - `SessionKeys`: encrypt and decrypt `DirectionKeys`
//!
//! ## Key Lifecycle
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │  SessionKeys (per negotiated key generation)               │
//! │  ├─ Supplied by the handshake layer (out of scope here)    │
//! │  ├─ Installed per direction into AeadDirectionContext      │
//! │  └─ Zeroed on drop, including early returns on error       │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - ALL key types MUST implement Zeroize
//! - Key material is never logged; `Debug` prints lengths only
//! - Equality is constant-time
//!
//! ## Last Modified
//! v0.1.0 - Initial key type definitions

use std::fmt;

use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::Direction;

// ============================================
// SecretBytes
// ============================================

/// Owned secret buffer, overwritten with zeros when dropped.
///
/// # Example
/// ```
/// use datachan_core::crypto::SecretBytes;
///
/// let key = SecretBytes::from_slice(&[0x42; 32]);
/// assert_eq!(key.len(), 32);
/// assert_eq!(format!("{key:?}"), "SecretBytes([REDACTED; 32])");
/// ```
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct SecretBytes(Vec<u8>);

impl SecretBytes {
    /// Takes ownership of `bytes`.
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Copies `bytes` into a new secret buffer.
    #[must_use]
    pub fn from_slice(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }

    /// Returns the secret bytes.
    ///
    /// # Security Warning
    /// Do not log or copy the returned slice into unprotected storage.
    #[must_use]
    pub fn expose(&self) -> &[u8] {
        &self.0
    }

    /// Length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for SecretBytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for SecretBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print key material
        write!(f, "SecretBytes([REDACTED; {}])", self.0.len())
    }
}

impl PartialEq for SecretBytes {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for SecretBytes {}

// ============================================
// DirectionKeys
// ============================================

/// Key material for one direction of the channel.
///
/// The cipher key keys AES-GCM; the leading bytes of the salt-source key
/// become that direction's nonce salt.
#[derive(Clone, Debug, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct DirectionKeys {
    /// AES key (at least the suite's key length).
    pub cipher_key: SecretBytes,
    /// Source of the 8-byte nonce salt.
    pub salt_key: SecretBytes,
}

impl DirectionKeys {
    /// Creates direction keys by copying the supplied slices.
    #[must_use]
    pub fn new(cipher_key: &[u8], salt_key: &[u8]) -> Self {
        Self {
            cipher_key: SecretBytes::from_slice(cipher_key),
            salt_key: SecretBytes::from_slice(salt_key),
        }
    }
}

// ============================================
// SessionKeys
// ============================================

/// Key material for both directions of one key generation.
#[derive(Clone, Debug, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SessionKeys {
    /// Keys for packets this endpoint seals.
    pub encrypt: DirectionKeys,
    /// Keys for packets this endpoint opens.
    pub decrypt: DirectionKeys,
}

impl SessionKeys {
    /// Creates session keys from both directions.
    #[must_use]
    pub fn new(encrypt: DirectionKeys, decrypt: DirectionKeys) -> Self {
        Self { encrypt, decrypt }
    }

    /// Returns the keys for `direction`.
    #[must_use]
    pub fn direction(&self, direction: Direction) -> &DirectionKeys {
        match direction {
            Direction::Encrypt => &self.encrypt,
            Direction::Decrypt => &self.decrypt,
        }
    }

    /// Returns the remote peer's view of these keys.
    ///
    /// What this endpoint encrypts with, the peer decrypts with.
    #[must_use]
    pub fn mirrored(&self) -> Self {
        Self {
            encrypt: self.decrypt.clone(),
            decrypt: self.encrypt.clone(),
        }
    }
}

// ============================================
// Tests
// ============================================
