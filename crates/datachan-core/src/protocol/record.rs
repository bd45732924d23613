// ============================================
// File: crates/datachan-core/src/protocol/record.rs
// ============================================
//! # Plain Record Framing
//!
//! The payload handed to `encode` is itself framed as
//! `compression tag (1 byte) ‖ data`. The tag is carried verbatim; no
//! compression is performed here.

use crate::error::{CoreError, Result};

/// Compression tag values.
pub mod compression {
    /// Payload is not compressed.
    pub const NONE: u8 = 0x00;
    /// Compression negotiated but this record left uncompressed.
    pub const STUB: u8 = 0xFB;
}

/// Prepends `compression` to `payload`.
#[must_use]
pub fn wrap_plain_record(compression: u8, payload: &[u8]) -> Vec<u8> {
    let mut record = Vec::with_capacity(1 + payload.len());
    record.push(compression);
    record.extend_from_slice(payload);
    record
}

/// Splits a record into its compression tag and data.
///
/// # Errors
/// Returns `MalformedPacket` if `record` is empty.
pub fn unwrap_plain_record(record: &[u8]) -> Result<(u8, &[u8])> {
    record
        .split_first()
        .map(|(&tag, data)| (tag, data))
        .ok_or(CoreError::malformed("empty plain record"))
}

/// Owned plain record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainRecord {
    /// Compression tag byte.
    pub compression: u8,
    /// Record data.
    pub payload: Vec<u8>,
}

impl PlainRecord {
    /// Creates a record with the given tag.
    #[must_use]
    pub fn new(compression: u8, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            compression,
            payload: payload.into(),
        }
    }

    /// Creates an uncompressed record.
    #[must_use]
    pub fn uncompressed(payload: impl Into<Vec<u8>>) -> Self {
        Self::new(compression::NONE, payload)
    }

    /// Serializes to `tag ‖ data`.
    #[must_use]
    pub fn wrap(&self) -> Vec<u8> {
        wrap_plain_record(self.compression, &self.payload)
    }

    /// Parses `tag ‖ data`.
    ///
    /// # Errors
    /// Returns `MalformedPacket` if `record` is empty.
    pub fn unwrap(record: &[u8]) -> Result<Self> {
        let (compression, data) = unwrap_plain_record(record)?;
        Ok(Self::new(compression, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_prepends_tag() {
        assert_eq!(wrap_plain_record(compression::NONE, b"ping"), b"\x00ping");
        assert_eq!(wrap_plain_record(compression::STUB, b""), [0xFB]);
    }

    #[test]
    fn test_unwrap_splits_tag() {
        let (tag, data) = unwrap_plain_record(b"\xFBdata").unwrap();
        assert_eq!(tag, compression::STUB);
        assert_eq!(data, b"data");

        // Tag only, no data
        let (tag, data) = unwrap_plain_record(&[0x00]).unwrap();
        assert_eq!(tag, 0);
        assert!(data.is_empty());
    }

    #[test]
    fn test_unwrap_empty_is_malformed() {
        assert!(unwrap_plain_record(&[]).unwrap_err().is_malformed());
        assert!(PlainRecord::unwrap(&[]).is_err());
    }

    #[test]
    fn test_plain_record_struct() {
        let record = PlainRecord::uncompressed(b"hello".to_vec());
        let bytes = record.wrap();
        assert_eq!(bytes.len(), 6);
        assert_eq!(PlainRecord::unwrap(&bytes).unwrap(), record);
    }
}
