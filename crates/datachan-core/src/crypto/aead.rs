// ============================================
// File: crates/datachan-core/src/crypto/aead.rs
// ============================================
//! # AEAD Direction Context
//!
//! ## Creation Reason
//! Provides authenticated encryption for data-channel packets. Owns one
//! encrypt-direction and one decrypt-direction GCM session, each with its
//! own key and nonce salt, and seals/opens keyed by an externally supplied
//! packet id and associated data.
//!
//! ## Main Functionality
//! - `configure_encryption` / `configure_decryption`: install a direction
//! - `seal`: payload -> `tag ‖ ciphertext`
//! - `open`: `tag ‖ ciphertext` -> payload, all-or-nothing
//!
//! ## Sealed Layout
//! ```text
//! ┌──────────────────────┬───────────────────────────────┐
//! │ GCM tag (16 bytes)   │ ciphertext (len(payload))     │
//! └──────────────────────┴───────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! The GCM key schedule is immutable after installation and the nonce is
//! passed per call, so `seal` and `open` take `&self` and may run
//! concurrently, including on the same direction. Installing or clearing
//! keys takes `&mut self`; exclusive access is the barrier against
//! in-flight traffic.
//!
//! ## ⚠️ Important Note for Next Developer
//! - Packet id MUST be unique per packet per direction key
//! - Never reuse (key, nonce) - catastrophic for GCM
//! - The context does not track counters; it applies what it is given
//!
//! ## Last Modified
//! v0.1.0 - Initial AEAD direction context

use tracing::debug;
use zeroize::Zeroize;

use datachan_common::PacketId;

use super::engine::GcmEngine;
use super::keys::SessionKeys;
use super::nonce::DirectionSalt;
use super::{CipherSuite, Direction, GCM_TAG_SIZE};
use crate::error::{CoreError, Result};

// ============================================
// DirectionState
// ============================================

/// Installed key schedule and salt for one direction.
#[derive(Debug)]
struct DirectionState {
    engine: GcmEngine,
    salt: DirectionSalt,
}

impl DirectionState {
    fn new(suite: CipherSuite, cipher_key: &[u8], salt_key: &[u8]) -> Result<Self> {
        let engine = GcmEngine::new(suite, cipher_key)?;
        let salt = DirectionSalt::derive(salt_key)?;
        Ok(Self { engine, salt })
    }
}

// ============================================
// AeadDirectionContext
// ============================================

/// Encrypt and decrypt GCM sessions for one data channel.
///
/// # Example
/// ```
/// use datachan_common::PacketId;
/// use datachan_core::crypto::{AeadDirectionContext, CipherSuite};
///
/// let mut alice = AeadDirectionContext::new(CipherSuite::AES_256_GCM);
/// alice.configure_encryption(&[1; 32], &[2; 32]).unwrap();
///
/// let mut bob = AeadDirectionContext::new(CipherSuite::AES_256_GCM);
/// bob.configure_decryption(&[1; 32], &[2; 32]).unwrap();
///
/// let sealed = alice.seal(b"ping", PacketId::new(1), b"ad").unwrap();
/// assert_eq!(sealed.len(), 16 + 4);
///
/// let opened = bob.open(&sealed, PacketId::new(1), b"ad").unwrap();
/// assert_eq!(opened, b"ping");
/// ```
#[derive(Debug)]
pub struct AeadDirectionContext {
    suite: CipherSuite,
    encrypt: Option<DirectionState>,
    decrypt: Option<DirectionState>,
}

impl AeadDirectionContext {
    /// Creates a context with no keys installed.
    #[must_use]
    pub const fn new(suite: CipherSuite) -> Self {
        Self {
            suite,
            encrypt: None,
            decrypt: None,
        }
    }

    /// Returns the configured cipher suite.
    #[must_use]
    pub const fn suite(&self) -> CipherSuite {
        self.suite
    }

    /// Bytes added by sealing (the tag).
    #[must_use]
    pub const fn overhead(&self) -> usize {
        GCM_TAG_SIZE
    }

    // ========================================
    // Key Installation
    // ========================================

    /// Installs the encrypt-direction key and derives its salt.
    ///
    /// # Errors
    /// Returns `InvalidKeyLength` if `cipher_key` is shorter than the
    /// suite's key length or `salt_key` is shorter than 8 bytes. On error
    /// the previously installed key stays in place.
    pub fn configure_encryption(&mut self, cipher_key: &[u8], salt_key: &[u8]) -> Result<()> {
        self.configure(Direction::Encrypt, cipher_key, salt_key)
    }

    /// Installs the decrypt-direction key and derives its salt.
    ///
    /// # Errors
    /// Same as [`configure_encryption`](Self::configure_encryption).
    pub fn configure_decryption(&mut self, cipher_key: &[u8], salt_key: &[u8]) -> Result<()> {
        self.configure(Direction::Decrypt, cipher_key, salt_key)
    }

    /// Installs the key for `direction`, replacing (and zeroing) any prior key.
    ///
    /// # Errors
    /// Same as [`configure_encryption`](Self::configure_encryption).
    pub fn configure(&mut self, direction: Direction, cipher_key: &[u8], salt_key: &[u8]) -> Result<()> {
        let state = DirectionState::new(self.suite, cipher_key, salt_key)?;

        let slot = self.slot_mut(direction);
        let rekey = slot.is_some();
        // Drop the old schedule and salt before the new one moves in.
        drop(slot.take());
        *slot = Some(state);

        debug!(suite = %self.suite, %direction, rekey, "Direction key installed");
        Ok(())
    }

    /// Installs both directions from `keys`.
    ///
    /// Both directions are validated before either is replaced.
    ///
    /// # Errors
    /// Same as [`configure_encryption`](Self::configure_encryption).
    pub fn install(&mut self, keys: &SessionKeys) -> Result<()> {
        let build = |direction: Direction| {
            let keys = keys.direction(direction);
            DirectionState::new(self.suite, keys.cipher_key.expose(), keys.salt_key.expose())
        };
        let encrypt = build(Direction::Encrypt)?;
        let decrypt = build(Direction::Decrypt)?;

        self.clear();
        self.encrypt = Some(encrypt);
        self.decrypt = Some(decrypt);

        debug!(suite = %self.suite, "Session keys installed");
        Ok(())
    }

    /// Removes the encrypt-direction key.
    pub fn clear_encryption(&mut self) {
        drop(self.encrypt.take());
    }

    /// Removes the decrypt-direction key.
    pub fn clear_decryption(&mut self) {
        drop(self.decrypt.take());
    }

    /// Removes both keys.
    pub fn clear(&mut self) {
        self.clear_encryption();
        self.clear_decryption();
    }

    /// Returns `true` if `direction` has a key installed.
    #[must_use]
    pub const fn is_configured(&self, direction: Direction) -> bool {
        match direction {
            Direction::Encrypt => self.encrypt.is_some(),
            Direction::Decrypt => self.decrypt.is_some(),
        }
    }

    // ========================================
    // Seal / Open
    // ========================================

    /// Seals `payload`, returning `tag ‖ ciphertext`.
    ///
    /// Output length is exactly `16 + payload.len()`.
    ///
    /// # Errors
    /// - `KeyNotInstalled` if no encrypt key is configured
    /// - `CryptoOperation` if the primitive fails
    pub fn seal(&self, payload: &[u8], packet_id: PacketId, associated_data: &[u8]) -> Result<Vec<u8>> {
        let mut out = vec![0u8; GCM_TAG_SIZE + payload.len()];
        self.seal_into(payload, packet_id, associated_data, &mut out)?;
        Ok(out)
    }

    /// Seals `payload` into `out`, which must be exactly `16 + payload.len()`
    /// bytes long.
    ///
    /// # Errors
    /// Same as [`seal`](Self::seal); additionally `CryptoOperation` if
    /// `out` has the wrong length.
    pub fn seal_into(
        &self,
        payload: &[u8],
        packet_id: PacketId,
        associated_data: &[u8],
        out: &mut [u8],
    ) -> Result<()> {
        let state = self.state(Direction::Encrypt)?;
        if out.len() != GCM_TAG_SIZE + payload.len() {
            return Err(CoreError::CryptoOperation {
                context: "seal output buffer has wrong length",
            });
        }

        let nonce = state.salt.nonce(packet_id);
        let (tag_out, body) = out.split_at_mut(GCM_TAG_SIZE);
        body.copy_from_slice(payload);

        match state.engine.seal_in_place(&nonce, associated_data, body) {
            Ok(tag) => {
                tag_out.copy_from_slice(&tag);
                Ok(())
            }
            Err(e) => {
                // Do not leave plaintext behind in the caller's buffer.
                body.zeroize();
                Err(e)
            }
        }
    }

    /// Opens `tag ‖ ciphertext`, returning the payload.
    ///
    /// No plaintext is returned unless the tag verifies.
    ///
    /// # Errors
    /// - `PacketTooShort` if `sealed` is shorter than the tag
    /// - `KeyNotInstalled` if no decrypt key is configured
    /// - `AuthenticationFailure` if the tag does not verify
    pub fn open(&self, sealed: &[u8], packet_id: PacketId, associated_data: &[u8]) -> Result<Vec<u8>> {
        if sealed.len() < GCM_TAG_SIZE {
            return Err(CoreError::too_short(GCM_TAG_SIZE, sealed.len()));
        }
        let state = self.state(Direction::Decrypt)?;

        let (tag, ciphertext) = sealed.split_at(GCM_TAG_SIZE);
        let mut tag_bytes = [0u8; GCM_TAG_SIZE];
        tag_bytes.copy_from_slice(tag);

        let nonce = state.salt.nonce(packet_id);
        let mut payload = ciphertext.to_vec();
        if let Err(e) = state.engine.open_in_place(&nonce, associated_data, &mut payload, &tag_bytes) {
            payload.zeroize();
            return Err(e);
        }
        Ok(payload)
    }

    // ========================================
    // Internal Helpers
    // ========================================

    fn state(&self, direction: Direction) -> Result<&DirectionState> {
        let slot = match direction {
            Direction::Encrypt => &self.encrypt,
            Direction::Decrypt => &self.decrypt,
        };
        slot.as_ref().ok_or(CoreError::KeyNotInstalled { direction })
    }

    fn slot_mut(&mut self, direction: Direction) -> &mut Option<DirectionState> {
        match direction {
            Direction::Encrypt => &mut self.encrypt,
            Direction::Decrypt => &mut self.decrypt,
        }
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::DirectionKeys;

    const ENC_KEY: [u8; 32] = [0x42; 32];
    const ENC_SALT: [u8; 32] = [0x17; 32];
    const DEC_KEY: [u8; 32] = [0x43; 32];
    const DEC_SALT: [u8; 32] = [0x18; 32];

    /// Returns (local, remote) contexts whose directions are cross-wired.
    fn pair(suite: CipherSuite) -> (AeadDirectionContext, AeadDirectionContext) {
        let mut local = AeadDirectionContext::new(suite);
        local.configure_encryption(&ENC_KEY, &ENC_SALT).unwrap();
        local.configure_decryption(&DEC_KEY, &DEC_SALT).unwrap();

        let mut remote = AeadDirectionContext::new(suite);
        remote.configure_encryption(&DEC_KEY, &DEC_SALT).unwrap();
        remote.configure_decryption(&ENC_KEY, &ENC_SALT).unwrap();
        (local, remote)
    }

    #[test]
    fn test_seal_open_roundtrip() {
        let (local, remote) = pair(CipherSuite::AES_256_GCM);
        let payload = b"Hello, tunnel!";

        let sealed = local.seal(payload, PacketId::new(1), b"\x00\x00\x00\x01").unwrap();
        assert_eq!(sealed.len(), payload.len() + GCM_TAG_SIZE);

        let opened = remote.open(&sealed, PacketId::new(1), b"\x00\x00\x00\x01").unwrap();
        assert_eq!(opened, payload);

        // And the other way round
        let sealed = remote.seal(b"pong", PacketId::new(9), b"").unwrap();
        assert_eq!(local.open(&sealed, PacketId::new(9), b"").unwrap(), b"pong");
    }

    #[test]
    fn test_directions_are_independent() {
        let (local, _) = pair(CipherSuite::AES_128_GCM);
        let sealed = local.seal(b"loop", PacketId::new(1), b"").unwrap();

        // Our own decrypt key is a different key: cannot open our own packet.
        let err = local.open(&sealed, PacketId::new(1), b"").unwrap_err();
        assert!(matches!(err, CoreError::AuthenticationFailure));
    }

    #[test]
    fn test_empty_payload() {
        let (local, remote) = pair(CipherSuite::AES_192_GCM);
        let sealed = local.seal(b"", PacketId::new(5), b"ad").unwrap();
        assert_eq!(sealed.len(), GCM_TAG_SIZE);
        assert!(remote.open(&sealed, PacketId::new(5), b"ad").unwrap().is_empty());
    }

    #[test]
    fn test_different_packet_ids_produce_different_tags() {
        let (local, _) = pair(CipherSuite::AES_256_GCM);
        let a = local.seal(b"same", PacketId::new(1), b"").unwrap();
        let b = local.seal(b"same", PacketId::new(2), b"").unwrap();
        assert_ne!(a[..GCM_TAG_SIZE], b[..GCM_TAG_SIZE]);
        assert_ne!(a[GCM_TAG_SIZE..], b[GCM_TAG_SIZE..]);
    }

    #[test]
    fn test_wrong_packet_id_fails() {
        let (local, remote) = pair(CipherSuite::AES_256_GCM);
        let sealed = local.seal(b"data", PacketId::new(1), b"").unwrap();
        let err = remote.open(&sealed, PacketId::new(2), b"").unwrap_err();
        assert!(matches!(err, CoreError::AuthenticationFailure));
    }

    #[test]
    fn test_wrong_associated_data_fails() {
        let (local, remote) = pair(CipherSuite::AES_256_GCM);
        let sealed = local.seal(b"data", PacketId::new(1), b"ad-a").unwrap();
        let err = remote.open(&sealed, PacketId::new(1), b"ad-b").unwrap_err();
        assert!(matches!(err, CoreError::AuthenticationFailure));
    }

    #[test]
    fn test_tampered_tag_and_ciphertext_fail() {
        let (local, remote) = pair(CipherSuite::AES_256_GCM);
        let sealed = local.seal(b"sensitive", PacketId::new(3), b"").unwrap();

        for idx in [0, GCM_TAG_SIZE - 1, GCM_TAG_SIZE, sealed.len() - 1] {
            let mut tampered = sealed.clone();
            tampered[idx] ^= 0x01;
            let err = remote.open(&tampered, PacketId::new(3), b"").unwrap_err();
            assert!(matches!(err, CoreError::AuthenticationFailure), "byte {idx}");
        }
    }

    #[test]
    fn test_short_input_is_malformed() {
        let (_, remote) = pair(CipherSuite::AES_256_GCM);
        let err = remote.open(&[0u8; 15], PacketId::new(1), b"").unwrap_err();
        assert!(matches!(err, CoreError::PacketTooShort { expected: 16, actual: 15 }));
    }

    #[test]
    fn test_unconfigured_direction() {
        let ctx = AeadDirectionContext::new(CipherSuite::AES_256_GCM);
        assert!(matches!(
            ctx.seal(b"x", PacketId::new(1), b"").unwrap_err(),
            CoreError::KeyNotInstalled { direction: Direction::Encrypt }
        ));
        assert!(matches!(
            ctx.open(&[0u8; 16], PacketId::new(1), b"").unwrap_err(),
            CoreError::KeyNotInstalled { direction: Direction::Decrypt }
        ));
    }

    #[test]
    fn test_short_cipher_key_rejected() {
        let mut ctx = AeadDirectionContext::new(CipherSuite::AES_256_GCM);
        let err = ctx.configure_encryption(&[0u8; 16], &ENC_SALT).unwrap_err();
        assert!(err.is_configuration_error());
        assert!(!ctx.is_configured(Direction::Encrypt));
    }

    #[test]
    fn test_failed_rekey_keeps_previous_key() {
        let (mut local, remote) = pair(CipherSuite::AES_256_GCM);
        assert!(local.configure_encryption(&[0u8; 4], &ENC_SALT).is_err());

        let sealed = local.seal(b"still", PacketId::new(1), b"").unwrap();
        assert_eq!(remote.open(&sealed, PacketId::new(1), b"").unwrap(), b"still");
    }

    #[test]
    fn test_rekey_replaces_key() {
        let (mut local, remote) = pair(CipherSuite::AES_256_GCM);
        local.configure_encryption(&[0x99; 32], &[0x98; 32]).unwrap();

        let sealed = local.seal(b"new key", PacketId::new(1), b"").unwrap();
        let err = remote.open(&sealed, PacketId::new(1), b"").unwrap_err();
        assert!(matches!(err, CoreError::AuthenticationFailure));
    }

    #[test]
    fn test_install_and_clear() {
        let keys = SessionKeys::new(
            DirectionKeys::new(&ENC_KEY, &ENC_SALT),
            DirectionKeys::new(&DEC_KEY, &DEC_SALT),
        );
        let mut local = AeadDirectionContext::new(CipherSuite::AES_256_GCM);
        local.install(&keys).unwrap();
        let mut remote = AeadDirectionContext::new(CipherSuite::AES_256_GCM);
        remote.install(&keys.mirrored()).unwrap();

        let sealed = local.seal(b"installed", PacketId::new(7), b"").unwrap();
        assert_eq!(remote.open(&sealed, PacketId::new(7), b"").unwrap(), b"installed");

        local.clear();
        assert!(!local.is_configured(Direction::Encrypt));
        assert!(!local.is_configured(Direction::Decrypt));
    }

    #[test]
    fn test_install_is_all_or_nothing() {
        let bad = SessionKeys::new(
            DirectionKeys::new(&ENC_KEY, &ENC_SALT),
            DirectionKeys::new(&DEC_KEY, &[0u8; 2]),
        );
        let (mut local, _) = pair(CipherSuite::AES_256_GCM);
        assert!(local.install(&bad).is_err());
        assert!(local.is_configured(Direction::Encrypt));
        assert!(local.is_configured(Direction::Decrypt));
    }

    #[test]
    fn test_seal_into_checks_length() {
        let (local, _) = pair(CipherSuite::AES_256_GCM);
        let mut out = [0u8; 10];
        let err = local.seal_into(b"abc", PacketId::new(1), b"", &mut out).unwrap_err();
        assert!(matches!(err, CoreError::CryptoOperation { .. }));
    }

    #[test]
    fn test_context_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AeadDirectionContext>();
    }
}
