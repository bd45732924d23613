// ============================================
// File: crates/datachan-common/src/types.rs
// ============================================
//! # Wire Identifier Types
//!
//! ## Creation Reason
//! The data-channel header packs several identifiers into fixed bit
//! fields. These newtypes make "fits the field" a construction-time
//! guarantee instead of a check scattered through the codec.
//!
//! ## Main Functionality
//! - `KeyId`: key generation selector, low 5 bits of header byte 0
//! - `PeerId`: 24-bit remote endpoint identifier (V2 headers only)
//! - `PacketId`: 32-bit per-direction packet counter, big-endian on the wire
//!
//! ## Header Bit Layout
//! ```text
//! byte 0:  7 6 5 | 4 3 2 1 0
//!          type  |  key id
//! bytes 1..4 (V2 only): peer id, 24-bit big-endian
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - `PacketId` doubles as nonce material. Reusing a value under the same
//!   key is catastrophic. Counter ownership belongs to the caller, which
//!   must rekey before the 32-bit space runs out.
//!
//! ## Last Modified
//! v0.1.0 - Initial identifier types

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CommonError, Result};

// ============================================
// Constants
// ============================================

/// Number of header bits reserved for the key id.
pub const KEY_ID_BITS: u32 = 5;

/// Mask selecting the key id from header byte 0.
pub const KEY_ID_MASK: u8 = (1 << KEY_ID_BITS) - 1;

/// Number of bits in a peer id.
pub const PEER_ID_BITS: u32 = 24;

/// Largest value a peer id field can carry.
pub const PEER_ID_MAX: u32 = (1 << PEER_ID_BITS) - 1;

/// Size of a packet id on the wire.
pub const PACKET_ID_SIZE: usize = 4;

// ============================================
// KeyId
// ============================================

/// Key generation selector carried in the low 5 bits of every header.
///
/// # Example
/// ```
/// use datachan_common::types::KeyId;
///
/// let key_id = KeyId::new(3).unwrap();
/// assert_eq!(key_id.as_u8(), 3);
/// assert!(KeyId::new(32).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct KeyId(u8);

impl KeyId {
    /// Largest representable key id.
    pub const MAX: u8 = KEY_ID_MASK;

    /// Creates a key id, rejecting values that do not fit 5 bits.
    ///
    /// # Errors
    /// Returns `OutOfRange` if `value > 31`.
    pub fn new(value: u8) -> Result<Self> {
        if value > Self::MAX {
            return Err(CommonError::out_of_range(
                "key_id",
                u64::from(value),
                u64::from(Self::MAX),
            ));
        }
        Ok(Self(value))
    }

    /// Returns the raw key id.
    #[must_use]
    pub const fn as_u8(&self) -> u8 {
        self.0
    }

    /// Extracts the key id from header byte 0. Always in range.
    #[must_use]
    pub const fn from_header_byte(byte: u8) -> Self {
        Self(byte & KEY_ID_MASK)
    }
}

impl TryFrom<u8> for KeyId {
    type Error = CommonError;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<KeyId> for u8 {
    fn from(id: KeyId) -> Self {
        id.0
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================
// PeerId
// ============================================

/// 24-bit identifier distinguishing multiplexed remote endpoints.
///
/// `PeerId::UNDEFINED` (all ones) is the conventional "no peer id"
/// marker; configuring it disables peer-id headers entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PeerId(u32);

impl PeerId {
    /// Largest representable peer id.
    pub const MAX: u32 = PEER_ID_MAX;

    /// Sentinel meaning "peer id not in use".
    pub const UNDEFINED: Self = Self(PEER_ID_MAX);

    /// Creates a peer id, rejecting values that do not fit 24 bits.
    ///
    /// # Errors
    /// Returns `OutOfRange` if `value > 0xFF_FFFF`.
    pub fn new(value: u32) -> Result<Self> {
        if value > Self::MAX {
            return Err(CommonError::out_of_range(
                "peer_id",
                u64::from(value),
                u64::from(Self::MAX),
            ));
        }
        Ok(Self(value))
    }

    /// Returns the raw peer id.
    #[must_use]
    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    /// Returns `true` for the "not in use" sentinel.
    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        self.0 == PEER_ID_MAX
    }

    /// Encodes the peer id as 3 big-endian bytes.
    #[must_use]
    pub const fn to_be_bytes(&self) -> [u8; 3] {
        let b = self.0.to_be_bytes();
        [b[1], b[2], b[3]]
    }

    /// Decodes a peer id from 3 big-endian bytes. Always in range.
    #[must_use]
    pub const fn from_be_bytes(bytes: [u8; 3]) -> Self {
        Self(u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]]))
    }
}

impl TryFrom<u32> for PeerId {
    type Error = CommonError;

    fn try_from(value: u32) -> Result<Self> {
        Self::new(value)
    }
}

impl From<PeerId> for u32 {
    fn from(id: PeerId) -> Self {
        id.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================
// PacketId
// ============================================

/// Per-direction packet counter.
///
/// Used as the leading 4 bytes of the AEAD nonce. The owner of the
/// counter (not the codec) is responsible for never repeating a value
/// under the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PacketId(u32);

impl PacketId {
    /// Creates a packet id from a raw value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }

    /// Returns the wire encoding (big-endian).
    #[must_use]
    pub const fn to_be_bytes(&self) -> [u8; PACKET_ID_SIZE] {
        self.0.to_be_bytes()
    }

    /// Decodes a packet id from its wire encoding.
    #[must_use]
    pub const fn from_be_bytes(bytes: [u8; PACKET_ID_SIZE]) -> Self {
        Self(u32::from_be_bytes(bytes))
    }
}

impl From<u32> for PacketId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<PacketId> for u32 {
    fn from(id: PacketId) -> Self {
        id.0
    }
}

impl fmt::Display for PacketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================
// Tests
// ============================================
