// ============================================
// File: crates/datachan-core/src/crypto/nonce.rs
// ============================================
//! # Nonce Construction
//!
//! ## Nonce Layout
//! ```text
//! nonce (12 bytes) = packet_id (4 bytes BE) || direction_salt (8 bytes)
//! ```
//!
//! The salt is taken once per key install from the leading bytes of the
//! direction's salt-source key, so it is stable across packets but
//! distinct per session and per direction. Uniqueness then rests entirely
//! on the caller never repeating a packet id under the same key.
//!
//! ## ⚠️ Important Note for Next Developer
//! - Do not change byte order or field order: both peers must agree
//! - Do not "repair" a repeated packet id here; apply it faithfully

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use datachan_common::PacketId;

use super::{DIRECTION_SALT_SIZE, GCM_IV_SIZE, NONCE_PACKET_ID_SIZE};
use crate::error::{CoreError, Result};

/// Per-direction nonce salt.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct DirectionSalt([u8; DIRECTION_SALT_SIZE]);

impl DirectionSalt {
    /// Derives the salt from the first 8 bytes of `salt_key`.
    ///
    /// # Errors
    /// Returns `InvalidKeyLength` if `salt_key` is shorter than 8 bytes.
    pub fn derive(salt_key: &[u8]) -> Result<Self> {
        let Some(prefix) = salt_key.get(..DIRECTION_SALT_SIZE) else {
            return Err(CoreError::key_length(
                "salt key",
                DIRECTION_SALT_SIZE,
                salt_key.len(),
            ));
        };
        let mut salt = [0u8; DIRECTION_SALT_SIZE];
        salt.copy_from_slice(prefix);
        Ok(Self(salt))
    }

    /// Builds the nonce for `packet_id`.
    #[must_use]
    pub fn nonce(&self, packet_id: PacketId) -> [u8; GCM_IV_SIZE] {
        let mut nonce = [0u8; GCM_IV_SIZE];
        nonce[..NONCE_PACKET_ID_SIZE].copy_from_slice(&packet_id.to_be_bytes());
        nonce[NONCE_PACKET_ID_SIZE..].copy_from_slice(&self.0);
        nonce
    }
}

impl fmt::Debug for DirectionSalt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DirectionSalt([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nonce_layout() {
        let salt = DirectionSalt::derive(&[0xA0, 0xA1, 0xA2, 0xA3, 0xA4, 0xA5, 0xA6, 0xA7, 0xFF]).unwrap();
        let nonce = salt.nonce(PacketId::new(0x0102_0304));
        assert_eq!(
            nonce,
            [0x01, 0x02, 0x03, 0x04, 0xA0, 0xA1, 0xA2, 0xA3, 0xA4, 0xA5, 0xA6, 0xA7]
        );
    }

    #[test]
    fn test_salt_uses_prefix_only() {
        let a = DirectionSalt::derive(&[7u8; 8]).unwrap();
        let mut longer = vec![7u8; 8];
        longer.extend_from_slice(&[9u8; 24]);
        let b = DirectionSalt::derive(&longer).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_short_salt_key_rejected() {
        let err = DirectionSalt::derive(&[1, 2, 3]).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidKeyLength { expected: 8, actual: 3, .. }
        ));
    }

    #[test]
    fn test_distinct_packet_ids_give_distinct_nonces() {
        let salt = DirectionSalt::derive(&[0u8; 8]).unwrap();
        assert_ne!(salt.nonce(PacketId::new(1)), salt.nonce(PacketId::new(2)));
    }
}
