// ============================================
// File: crates/datachan-cli/src/lib.rs
// ============================================
//! # datachan CLI Library
//!
//! ## Creation Reason
//! Backs the `datachan` binary: channel configuration files and the
//! error type shared by its subcommands.
//!
//! ## Main Functionality
//! - [`config`]: `ChannelConfig` TOML loading, validation, key generation
//! - [`error`]: CLI-specific error types
//!
//! ## ⚠️ Important Note for Next Developer
//! - Config files contain live session keys; treat them like private keys
//! - Logging goes to stderr so stdout stays machine-readable
//!
//! ## Last Modified
//! v0.1.0 - Initial CLI library

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;

// Re-export primary types
pub use config::ChannelConfig;
pub use error::{CliError, Result};
