// ============================================
// File: crates/datachan-core/src/crypto/suite.rs
// ============================================
//! # Cipher Suite Registry
//!
//! ## Creation Reason
//! Resolves the configured cipher name once, at configuration time, into
//! an immutable descriptor. Only GCM-mode ciphers are accepted; anything
//! else is a configuration error before any traffic flows.
//!
//! ## Supported Suites
//! | Name        | Key | IV | Tag |
//! |-------------|-----|----|-----|
//! | AES-128-GCM | 16  | 12 | 16  |
//! | AES-192-GCM | 24  | 12 | 16  |
//! | AES-256-GCM | 32  | 12 | 16  |
//!
//! ## Last Modified
//! v0.1.0 - Initial suite registry

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{GCM_IV_SIZE, GCM_TAG_SIZE};
use crate::error::{CoreError, Result};

// ============================================
// GcmCipher
// ============================================

/// Block cipher driven in GCM mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GcmCipher {
    /// AES with a 128-bit key.
    Aes128,
    /// AES with a 192-bit key.
    Aes192,
    /// AES with a 256-bit key.
    Aes256,
}

// ============================================
// CipherSuite
// ============================================

/// Immutable description of the data-channel AEAD.
///
/// # Example
/// ```
/// use datachan_core::crypto::CipherSuite;
///
/// let suite: CipherSuite = "aes-256-gcm".parse().unwrap();
/// assert_eq!(suite.key_len(), 32);
/// assert_eq!(suite.iv_len(), 12);
/// assert_eq!(suite.tag_len(), 16);
/// assert_eq!(suite.to_string(), "AES-256-GCM");
///
/// assert!("CHACHA20-POLY1305".parse::<CipherSuite>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CipherSuite {
    cipher: GcmCipher,
}

impl CipherSuite {
    /// AES-128-GCM.
    pub const AES_128_GCM: Self = Self::new(GcmCipher::Aes128);
    /// AES-192-GCM.
    pub const AES_192_GCM: Self = Self::new(GcmCipher::Aes192);
    /// AES-256-GCM.
    pub const AES_256_GCM: Self = Self::new(GcmCipher::Aes256);

    /// Creates a suite for the given block cipher.
    #[must_use]
    pub const fn new(cipher: GcmCipher) -> Self {
        Self { cipher }
    }

    /// Resolves a cipher name.
    ///
    /// Matching ignores ASCII case and accepts `_` in place of `-`.
    ///
    /// # Errors
    /// Returns `UnsupportedCipher` for any name that is not an AES-GCM suite.
    pub fn from_name(name: &str) -> Result<Self> {
        let normalized = name.trim().to_ascii_uppercase().replace('_', "-");
        let cipher = match normalized.as_str() {
            "AES-128-GCM" => GcmCipher::Aes128,
            "AES-192-GCM" => GcmCipher::Aes192,
            "AES-256-GCM" => GcmCipher::Aes256,
            _ => return Err(CoreError::unsupported_cipher(name)),
        };
        Ok(Self::new(cipher))
    }

    /// Returns the underlying block cipher.
    #[must_use]
    pub const fn cipher(&self) -> GcmCipher {
        self.cipher
    }

    /// Canonical suite name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self.cipher {
            GcmCipher::Aes128 => "AES-128-GCM",
            GcmCipher::Aes192 => "AES-192-GCM",
            GcmCipher::Aes256 => "AES-256-GCM",
        }
    }

    /// Required cipher key length in bytes.
    #[must_use]
    pub const fn key_len(&self) -> usize {
        match self.cipher {
            GcmCipher::Aes128 => 16,
            GcmCipher::Aes192 => 24,
            GcmCipher::Aes256 => 32,
        }
    }

    /// Nonce length in bytes (always 12).
    #[must_use]
    pub const fn iv_len(&self) -> usize {
        GCM_IV_SIZE
    }

    /// Tag length in bytes (always 16).
    #[must_use]
    pub const fn tag_len(&self) -> usize {
        GCM_TAG_SIZE
    }
}

impl Default for CipherSuite {
    fn default() -> Self {
        Self::AES_256_GCM
    }
}

impl FromStr for CipherSuite {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

impl TryFrom<String> for CipherSuite {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self> {
        Self::from_name(&s)
    }
}

impl From<CipherSuite> for String {
    fn from(suite: CipherSuite) -> Self {
        suite.name().to_string()
    }
}

impl fmt::Display for CipherSuite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================
// Tests
// ============================================
