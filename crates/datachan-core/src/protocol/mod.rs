// ============================================
// File: crates/datachan-core/src/protocol/mod.rs
// ============================================
//! # Protocol Module
//!
//! ## Creation Reason
//! Defines the data-channel wire format and the codec that produces and
//! consumes it.
//!
//! ## Main Functionality
//!
//! ### Submodules
//! - [`header`]: packet type + key id (+ peer id) header encoding
//! - [`codec`]: `DataChannelCodec`, framing and AD policy
//! - [`record`]: compression-tag framing of plaintext payloads
//! - [`stats`]: per-codec counters
//!
//! ## Wire Format Principles
//! - Big-endian byte order for multi-byte integers
//! - Fixed-size header and packet id; only the ciphertext varies
//! - The header variant is a per-codec setting, never negotiated inline
//!
//! ## ⚠️ Important Note for Next Developer
//! - ANY layout change breaks interop with deployed peers
//! - Keep the AD split between V1 and V2 exactly as is
//!
//! ## Last Modified
//! v0.1.0 - Initial protocol definitions

pub mod codec;
pub mod header;
pub mod record;
pub mod stats;

// Re-export primary types
pub use codec::{DataChannelCodec, DecodedPacket, HeaderVariant};
pub use header::{Header, PacketType, DATA_V1_HEADER_SIZE, DATA_V2_HEADER_SIZE};
pub use record::{compression, unwrap_plain_record, wrap_plain_record, PlainRecord};
pub use stats::{CodecStats, StatsSnapshot};
