// ============================================
// File: crates/datachan-core/src/lib.rs
// ============================================
//! # datachan Core - Data-Channel Codec Library
//!
//! ## Creation Reason
//! Implements the per-packet authenticated encryption layer of a VPN
//! tunnel's data channel: sealing tunnel payloads into wire frames with
//! AES-GCM and authenticating, decrypting and peer-checking them on
//! receipt.
//!
//! ## Main Functionality
//!
//! ### Crypto Module ([`crypto`])
//! - Cipher suite registry (AES-128/192/256-GCM)
//! - Zeroizing key containers (`SecretBytes`, `SessionKeys`)
//! - `AeadDirectionContext`: independent encrypt/decrypt GCM sessions
//!
//! ### Protocol Module ([`protocol`])
//! - Header codec (V1 1-byte, V2 4-byte with peer id)
//! - `DataChannelCodec`: framing, AD policy, peer-id gating
//! - Plain record framing and codec counters
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                 datachan-cli                        │
//! │                    │                                │
//! │                    ▼                                │
//! │              datachan-core  ◄── You are here        │
//! │                    │                                │
//! │                    ▼                                │
//! │             datachan-common                         │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Out of Scope
//! Key negotiation, replay windows, compression and transport I/O all
//! live in collaborators. This crate is handed keys, packet ids and peer
//! ids and applies them faithfully.
//!
//! ## ⚠️ Important Note for Next Developer
//! - ALL cryptographic code uses audited RustCrypto implementations
//! - NEVER implement custom crypto primitives
//! - ALL keys MUST implement Zeroize for secure cleanup
//! - Wire format changes break deployed peers
//!
//! ## Last Modified
//! v0.1.0 - Initial implementation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod crypto;
pub mod error;
pub mod protocol;

// Re-export commonly used items
pub use crypto::{AeadDirectionContext, CipherSuite, DirectionKeys, SecretBytes, SessionKeys};
pub use error::{CoreError, Result};
pub use protocol::{DataChannelCodec, DecodedPacket, Header, HeaderVariant, PacketType, PlainRecord};
