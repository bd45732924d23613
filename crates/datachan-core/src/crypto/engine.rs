// ============================================
// File: crates/datachan-core/src/crypto/engine.rs
// ============================================
//! # GCM Engine Binding
//!
//! ## Creation Reason
//! Thin adapter over the RustCrypto `aes-gcm` primitive. It owns the key
//! schedule and exposes detached-tag seal/open on caller buffers; nothing
//! outside the AEAD direction context ever sees it.
//!
//! ## Main Functionality
//! - `GcmEngine::new`: key schedule for the configured suite
//! - `seal_in_place`: encrypt buffer, return tag
//! - `open_in_place`: verify tag, then decrypt buffer
//!
//! ## ⚠️ Important Note for Next Developer
//! - `open_in_place` verifies before it decrypts; on failure the buffer
//!   still holds ciphertext. Callers must still discard it.
//! - The key schedule is immutable after construction, so `&self` calls
//!   from several threads are safe.
//! - AES round keys and the GHASH subkey are wiped on drop only because
//!   the `zeroize` features of `aes`, `aes-gcm`, `ghash` and `polyval`
//!   are enabled in the workspace manifest. Keep them on.

use std::fmt;

use aes::Aes192;
use aes_gcm::aead::consts::U12;
use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm, Nonce, Tag};

use super::{CipherSuite, GcmCipher, GCM_IV_SIZE, GCM_TAG_SIZE};
use crate::error::{CoreError, Result};

/// AES-192 in GCM mode with a 96-bit nonce.
type Aes192Gcm = AesGcm<Aes192, U12>;

// ============================================
// GcmEngine
// ============================================

/// Keyed AES-GCM instance for one direction.
#[derive(Clone)]
pub enum GcmEngine {
    /// AES-128-GCM.
    Aes128(Box<Aes128Gcm>),
    /// AES-192-GCM.
    Aes192(Box<Aes192Gcm>),
    /// AES-256-GCM.
    Aes256(Box<Aes256Gcm>),
}

impl GcmEngine {
    /// Runs the key schedule for `suite`.
    ///
    /// Only the first `suite.key_len()` bytes of `key` are used.
    ///
    /// # Errors
    /// Returns `InvalidKeyLength` if `key` is shorter than the suite requires.
    pub fn new(suite: CipherSuite, key: &[u8]) -> Result<Self> {
        let key_len = suite.key_len();
        let Some(key) = key.get(..key_len) else {
            return Err(CoreError::key_length("cipher key", key_len, key.len()));
        };

        let invalid = |_| CoreError::key_length("cipher key", key_len, key.len());
        let engine = match suite.cipher() {
            GcmCipher::Aes128 => Self::Aes128(Box::new(Aes128Gcm::new_from_slice(key).map_err(invalid)?)),
            GcmCipher::Aes192 => Self::Aes192(Box::new(Aes192Gcm::new_from_slice(key).map_err(invalid)?)),
            GcmCipher::Aes256 => Self::Aes256(Box::new(Aes256Gcm::new_from_slice(key).map_err(invalid)?)),
        };
        Ok(engine)
    }

    /// Encrypts `buffer` in place and returns the tag.
    ///
    /// # Errors
    /// Returns `CryptoOperation` if the primitive rejects the input.
    pub fn seal_in_place(
        &self,
        nonce: &[u8; GCM_IV_SIZE],
        associated_data: &[u8],
        buffer: &mut [u8],
    ) -> Result<[u8; GCM_TAG_SIZE]> {
        let nonce = Nonce::<U12>::from_slice(nonce);
        let tag = match self {
            Self::Aes128(c) => c.encrypt_in_place_detached(nonce, associated_data, buffer),
            Self::Aes192(c) => c.encrypt_in_place_detached(nonce, associated_data, buffer),
            Self::Aes256(c) => c.encrypt_in_place_detached(nonce, associated_data, buffer),
        }
        .map_err(|_| CoreError::CryptoOperation { context: "AES-GCM seal" })?;

        let mut out = [0u8; GCM_TAG_SIZE];
        out.copy_from_slice(&tag);
        Ok(out)
    }

    /// Verifies `tag` and decrypts `buffer` in place.
    ///
    /// # Errors
    /// Returns `AuthenticationFailure` if the tag does not verify.
    pub fn open_in_place(
        &self,
        nonce: &[u8; GCM_IV_SIZE],
        associated_data: &[u8],
        buffer: &mut [u8],
        tag: &[u8; GCM_TAG_SIZE],
    ) -> Result<()> {
        let nonce = Nonce::<U12>::from_slice(nonce);
        let tag = Tag::from_slice(tag);
        match self {
            Self::Aes128(c) => c.decrypt_in_place_detached(nonce, associated_data, buffer, tag),
            Self::Aes192(c) => c.decrypt_in_place_detached(nonce, associated_data, buffer, tag),
            Self::Aes256(c) => c.decrypt_in_place_detached(nonce, associated_data, buffer, tag),
        }
        .map_err(|_| CoreError::AuthenticationFailure)
    }
}

impl fmt::Debug for GcmEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Aes128(_) => "AES-128-GCM",
            Self::Aes192(_) => "AES-192-GCM",
            Self::Aes256(_) => "AES-256-GCM",
        };
        write!(f, "GcmEngine({name})")
    }
}

// ============================================
// Tests
// ============================================
