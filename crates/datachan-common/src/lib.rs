// ============================================
// File: crates/datachan-common/src/lib.rs
// ============================================
//! # Datachan Common - Shared Wire Identifiers
//!
//! ## Creation Reason
//! Provides the small, range-checked identifier types that every layer of
//! the data channel agrees on, so that a key id or peer id which cannot be
//! represented on the wire is rejected once, at construction.
//!
//! ## Main Functionality
//! - [`types`]: `KeyId` (5 bits), `PeerId` (24 bits), `PacketId` (32 bits)
//! - [`error`]: `CommonError` and the `Result` alias
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                 datachan-cli                        │
//! │                      │                              │
//! │                      ▼                              │
//! │                datachan-core                        │
//! │                      │                              │
//! │                      ▼                              │
//! │               datachan-common  ◄── You are here     │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - Bit widths here ARE the wire format. Widening a type is a protocol change.
//! - Keep this crate free of crypto dependencies.
//!
//! ## Last Modified
//! v0.1.0 - Initial identifier types

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod types;

// Re-export commonly used items at crate root
pub use error::{CommonError, Result};
pub use types::{KeyId, PacketId, PeerId};
