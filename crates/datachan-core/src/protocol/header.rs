// ============================================
// File: crates/datachan-core/src/protocol/header.rs
// ============================================
//! # Data Packet Header
//!
//! ## Creation Reason
//! Pure, stateless encoding and parsing of the data-channel header.
//! Holds no keys, so a receiver can also use it to route a frame before
//! any decryption.
//!
//! ## Wire Format
//! ```text
//! V1 (1 byte):
//! ┌─────────────┬──────────────────┐
//! │ type (3 bit)│ key id (5 bit)   │
//! └─────────────┴──────────────────┘
//!
//! V2 (4 bytes):
//! ┌─────────────┬──────────────────┬─────────────────────────────┐
//! │ type (3 bit)│ key id (5 bit)   │ peer id (24 bit, BE)        │
//! └─────────────┴──────────────────┴─────────────────────────────┘
//! ```
//!
//! ## Packet Types
//! | Value | Type   | Header |
//! |-------|--------|--------|
//! | 6     | DataV1 | 1 byte |
//! | 7     | DataV2 | 4 bytes|
//!
//! ## ⚠️ Important Note for Next Developer
//! - Field order and bit positions are fixed; both peers must agree
//! - Range checks here surface as `InvalidArgument`, never as a truncated
//!   field on the wire
//!
//! ## Last Modified
//! v0.1.0 - Initial header codec

use std::fmt;

use datachan_common::types::KEY_ID_BITS;
use datachan_common::{CommonError, KeyId, PeerId};

use crate::error::{CoreError, Result};

// ============================================
// Constants
// ============================================

/// Header size when peer ids are disabled.
pub const DATA_V1_HEADER_SIZE: usize = 1;

/// Header size when peer ids are enabled.
pub const DATA_V2_HEADER_SIZE: usize = 4;

/// Largest value the 3-bit packet type field can hold.
pub const PACKET_TYPE_MAX: u8 = 0b111;

const PACKET_TYPE_SHIFT: u32 = KEY_ID_BITS;

// ============================================
// PacketType
// ============================================

/// Packet type carried in the top 3 bits of header byte 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PacketType {
    /// Data packet with a 1-byte header.
    DataV1 = 6,
    /// Data packet with a 4-byte header carrying a peer id.
    DataV2 = 7,
}

impl PacketType {
    /// Converts a 3-bit type value.
    ///
    /// # Returns
    /// `None` for values that are not data packets.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            6 => Some(Self::DataV1),
            7 => Some(Self::DataV2),
            _ => None,
        }
    }

    /// Reads the type from header byte 0.
    #[must_use]
    pub const fn from_header_byte(byte: u8) -> Option<Self> {
        Self::from_bits(byte >> PACKET_TYPE_SHIFT)
    }

    /// Returns the 3-bit type value.
    #[must_use]
    pub const fn as_bits(&self) -> u8 {
        *self as u8
    }

    /// Header length implied by this type.
    #[must_use]
    pub const fn header_len(&self) -> usize {
        match self {
            Self::DataV1 => DATA_V1_HEADER_SIZE,
            Self::DataV2 => DATA_V2_HEADER_SIZE,
        }
    }
}

impl fmt::Display for PacketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DataV1 => write!(f, "DATA_V1"),
            Self::DataV2 => write!(f, "DATA_V2"),
        }
    }
}

// ============================================
// Raw Header Encoding
// ============================================

/// Packs a type value and key id into header byte 0.
fn type_byte(packet_type: u8, key_id: u8) -> Result<u8> {
    if packet_type > PACKET_TYPE_MAX {
        return Err(CommonError::out_of_range(
            "packet_type",
            u64::from(packet_type),
            u64::from(PACKET_TYPE_MAX),
        )
        .into());
    }
    let key_id = KeyId::new(key_id)?;
    Ok((packet_type << PACKET_TYPE_SHIFT) | key_id.as_u8())
}

/// Encodes a 1-byte header from raw field values.
///
/// # Errors
/// Returns `InvalidArgument` if `packet_type` does not fit 3 bits or
/// `key_id` does not fit 5 bits.
///
/// # Example
/// ```
/// use datachan_core::protocol::header::encode_v1;
///
/// assert_eq!(encode_v1(6, 0).unwrap(), [0xC0]);
/// assert!(encode_v1(6, 32).is_err());
/// ```
pub fn encode_v1(packet_type: u8, key_id: u8) -> Result<[u8; DATA_V1_HEADER_SIZE]> {
    Ok([type_byte(packet_type, key_id)?])
}

/// Encodes a 4-byte header from raw field values.
///
/// # Errors
/// Returns `InvalidArgument` if any field is out of range
/// (`peer_id` must fit 24 bits).
pub fn encode_v2(packet_type: u8, key_id: u8, peer_id: u32) -> Result<[u8; DATA_V2_HEADER_SIZE]> {
    let first = type_byte(packet_type, key_id)?;
    let peer = PeerId::new(peer_id)?.to_be_bytes();
    Ok([first, peer[0], peer[1], peer[2]])
}

// ============================================
// Header
// ============================================

/// Parsed or to-be-written data packet header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Packet type (determines header length).
    pub packet_type: PacketType,
    /// Key generation the packet was sealed under.
    pub key_id: KeyId,
    /// Peer id, present only for `DataV2`.
    pub peer_id: Option<PeerId>,
}

impl Header {
    /// Creates a V1 header.
    #[must_use]
    pub const fn v1(key_id: KeyId) -> Self {
        Self {
            packet_type: PacketType::DataV1,
            key_id,
            peer_id: None,
        }
    }

    /// Creates a V2 header.
    #[must_use]
    pub const fn v2(key_id: KeyId, peer_id: PeerId) -> Self {
        Self {
            packet_type: PacketType::DataV2,
            key_id,
            peer_id: Some(peer_id),
        }
    }

    /// Encoded length in bytes.
    #[must_use]
    pub const fn encoded_len(&self) -> usize {
        self.packet_type.header_len()
    }

    /// Header byte 0.
    #[must_use]
    pub const fn first_byte(&self) -> u8 {
        (self.packet_type.as_bits() << PACKET_TYPE_SHIFT) | self.key_id.as_u8()
    }

    /// Appends the encoded header to `buf`.
    pub fn write_to(&self, buf: &mut Vec<u8>) {
        buf.push(self.first_byte());
        if self.packet_type == PacketType::DataV2 {
            let peer = self.peer_id.unwrap_or(PeerId::UNDEFINED);
            buf.extend_from_slice(&peer.to_be_bytes());
        }
    }

    /// Returns the encoded header.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.write_to(&mut buf);
        buf
    }

    /// Parses the header at the start of `frame` without touching the rest.
    ///
    /// # Errors
    /// - `PacketTooShort` if `frame` cannot hold the header its type implies
    /// - `MalformedPacket` if the type is not a data packet
    pub fn peek(frame: &[u8]) -> Result<Self> {
        let Some(&first) = frame.first() else {
            return Err(CoreError::too_short(DATA_V1_HEADER_SIZE, 0));
        };
        let packet_type = PacketType::from_header_byte(first)
            .ok_or(CoreError::malformed("unknown packet type"))?;
        let key_id = KeyId::from_header_byte(first);

        match packet_type {
            PacketType::DataV1 => Ok(Self::v1(key_id)),
            PacketType::DataV2 => {
                let Some(peer) = frame.get(1..DATA_V2_HEADER_SIZE) else {
                    return Err(CoreError::too_short(DATA_V2_HEADER_SIZE, frame.len()));
                };
                let peer_id = PeerId::from_be_bytes([peer[0], peer[1], peer[2]]);
                Ok(Self::v2(key_id, peer_id))
            }
        }
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} key_id={}", self.packet_type, self.key_id)?;
        if let Some(peer_id) = self.peer_id {
            write!(f, " peer_id={peer_id}")?;
        }
        Ok(())
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_v1_bit_layout() {
        assert_eq!(encode_v1(6, 0).unwrap(), [0b1100_0000]);
        assert_eq!(encode_v1(6, 31).unwrap(), [0b1101_1111]);
        assert_eq!(encode_v1(7, 5).unwrap(), [0b1110_0101]);
        assert_eq!(encode_v1(0, 0).unwrap(), [0]);
    }

    #[test]
    fn test_encode_v2_bit_layout() {
        assert_eq!(encode_v2(7, 2, 0x0A_0B0C).unwrap(), [0xE2, 0x0A, 0x0B, 0x0C]);
        assert_eq!(encode_v2(7, 0, 0xFF_FFFF).unwrap(), [0xE0, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn test_encode_rejects_out_of_range() {
        assert!(encode_v1(6, 32).unwrap_err().is_invalid_argument());
        assert!(encode_v1(8, 0).unwrap_err().is_invalid_argument());
        assert!(encode_v2(7, 0, 0x100_0000).unwrap_err().is_invalid_argument());
        assert!(encode_v2(7, 40, 1).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_typed_header_matches_raw_encoding() {
        let key_id = KeyId::new(9).unwrap();
        let peer_id = PeerId::new(0x12_3456).unwrap();

        assert_eq!(Header::v1(key_id).to_bytes(), encode_v1(6, 9).unwrap());
        assert_eq!(Header::v2(key_id, peer_id).to_bytes(), encode_v2(7, 9, 0x12_3456).unwrap());
    }

    #[test]
    fn test_peek_v1() {
        let header = Header::peek(&[0xC3, 0x00, 0x00, 0x00, 0x01]).unwrap();
        assert_eq!(header.packet_type, PacketType::DataV1);
        assert_eq!(header.key_id.as_u8(), 3);
        assert_eq!(header.peer_id, None);
        assert_eq!(header.encoded_len(), 1);
    }

    #[test]
    fn test_peek_v2() {
        let header = Header::peek(&[0xE1, 0x00, 0x01, 0x02, 0xAA]).unwrap();
        assert_eq!(header.packet_type, PacketType::DataV2);
        assert_eq!(header.key_id.as_u8(), 1);
        assert_eq!(header.peer_id, Some(PeerId::new(0x0102).unwrap()));
        assert_eq!(header.encoded_len(), 4);
    }

    #[test]
    fn test_peek_rejects_bad_input() {
        assert!(Header::peek(&[]).unwrap_err().is_malformed());
        // Type 1 is not a data packet
        assert!(Header::peek(&[0x20]).unwrap_err().is_malformed());
        // V2 type but truncated peer id
        assert!(matches!(
            Header::peek(&[0xE0, 0x01]).unwrap_err(),
            CoreError::PacketTooShort { expected: 4, actual: 2 }
        ));
    }

    #[test]
    fn test_display() {
        let header = Header::v2(KeyId::new(2).unwrap(), PeerId::new(77).unwrap());
        assert_eq!(header.to_string(), "DATA_V2 key_id=2 peer_id=77");
    }
}
