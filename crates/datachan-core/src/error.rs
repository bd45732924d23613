// ============================================
// File: crates/datachan-core/src/error.rs
// ============================================
//! # Core Error Types
//!
//! ## Creation Reason
//! Defines the failure kinds of the data-channel codec and separates
//! configuration mistakes from the per-packet failures that are routine
//! under hostile network input.
//!
//! ## Error Categories
//! 1. **Configuration**: unsupported cipher, short key, direction not keyed
//! 2. **Invalid argument**: key id / peer id outside their bit width
//! 3. **Per-packet**: malformed frame, authentication failure, peer-id mismatch
//! 4. **Primitive**: the AEAD engine itself reported an error
//!
//! ## ⚠️ Important Note for Next Developer
//! - NEVER include key or salt material in error messages
//! - Per-packet errors must stay cheap: no allocation on the hot reject path
//!   beyond what the variant already carries
//! - Keep `AuthenticationFailure` and `PeerIdMismatch` distinct; the latter
//!   is a cryptographically valid packet from the wrong context
//!
//! ## Last Modified
//! v0.1.0 - Initial error definitions

use thiserror::Error;

use datachan_common::error::CommonError;
use datachan_common::PeerId;

use crate::crypto::Direction;

// ============================================
// Result Type Alias
// ============================================

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

// ============================================
// CoreError
// ============================================

/// Error kinds for cipher configuration and packet processing.
#[derive(Error, Debug)]
pub enum CoreError {
    // ========================================
    // Configuration Errors
    // ========================================

    /// Cipher name does not resolve to a supported GCM suite.
    #[error("Unsupported cipher: '{name}' (expected AES-128-GCM, AES-192-GCM or AES-256-GCM)")]
    UnsupportedCipher {
        /// Name as supplied by configuration
        name: String,
    },

    /// Key material shorter than the suite requires.
    #[error("Invalid {what} length: need at least {expected} bytes, got {actual}")]
    InvalidKeyLength {
        /// Which key was being installed
        what: &'static str,
        /// Minimum length in bytes
        expected: usize,
        /// Length supplied
        actual: usize,
    },

    /// Seal or open attempted before the direction was keyed.
    #[error("No key installed for {direction} direction")]
    KeyNotInstalled {
        /// Direction lacking a key
        direction: Direction,
    },

    // ========================================
    // Argument Errors
    // ========================================

    /// Identifier outside the range its header field can carry.
    #[error(transparent)]
    InvalidArgument(#[from] CommonError),

    // ========================================
    // Per-Packet Errors
    // ========================================

    /// Frame too short to hold header, packet id and tag.
    #[error("Packet too short: expected at least {expected} bytes, got {actual}")]
    PacketTooShort {
        /// Minimum frame length
        expected: usize,
        /// Actual frame length
        actual: usize,
    },

    /// Frame structure is invalid (unknown type, wrong header version).
    #[error("Malformed packet: {reason}")]
    MalformedPacket {
        /// What is wrong with the frame
        reason: &'static str,
    },

    /// Tag verification failed. No plaintext is released.
    #[error("Authentication failed")]
    AuthenticationFailure,

    /// Packet authenticated, but carries another peer's id.
    #[error("Peer id mismatch: expected {expected}, received {received}")]
    PeerIdMismatch {
        /// Peer id this codec is configured for
        expected: PeerId,
        /// Peer id found in the frame header
        received: PeerId,
    },

    // ========================================
    // Primitive Errors
    // ========================================

    /// Underlying AEAD primitive failed on well-formed input.
    #[error("Crypto operation failed: {context}")]
    CryptoOperation {
        /// Which operation failed
        context: &'static str,
    },
}

impl CoreError {
    // ========================================
    // Convenience Constructors
    // ========================================

    /// Creates an `UnsupportedCipher` error.
    pub fn unsupported_cipher(name: impl Into<String>) -> Self {
        Self::UnsupportedCipher { name: name.into() }
    }

    /// Creates an `InvalidKeyLength` error.
    #[must_use]
    pub const fn key_length(what: &'static str, expected: usize, actual: usize) -> Self {
        Self::InvalidKeyLength {
            what,
            expected,
            actual,
        }
    }

    /// Creates a `PacketTooShort` error.
    #[must_use]
    pub const fn too_short(expected: usize, actual: usize) -> Self {
        Self::PacketTooShort { expected, actual }
    }

    /// Creates a `MalformedPacket` error.
    #[must_use]
    pub const fn malformed(reason: &'static str) -> Self {
        Self::MalformedPacket { reason }
    }

    // ========================================
    // Error Classification
    // ========================================

    /// Returns `true` for misconfiguration detected before traffic flows.
    #[must_use]
    pub const fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedCipher { .. }
                | Self::InvalidKeyLength { .. }
                | Self::KeyNotInstalled { .. }
        )
    }

    /// Returns `true` for caller bugs (identifier out of range).
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Returns `true` if the frame was structurally unusable.
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        matches!(self, Self::PacketTooShort { .. } | Self::MalformedPacket { .. })
    }

    /// Returns `true` for per-packet failures: drop the packet and carry on.
    ///
    /// These are expected under corruption or attack and must never abort
    /// the process.
    #[must_use]
    pub const fn is_drop_worthy(&self) -> bool {
        matches!(
            self,
            Self::PacketTooShort { .. }
                | Self::MalformedPacket { .. }
                | Self::AuthenticationFailure
                | Self::PeerIdMismatch { .. }
        )
    }

    /// Returns `true` if this error might indicate forgery or spoofing.
    ///
    /// These warrant counting for anti-spoof telemetry.
    #[must_use]
    pub const fn is_suspicious(&self) -> bool {
        matches!(self, Self::AuthenticationFailure | Self::PeerIdMismatch { .. })
    }

    /// Stable category name, suitable for logs and exit messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedCipher { .. } | Self::InvalidKeyLength { .. } | Self::KeyNotInstalled { .. } => {
                "ConfigurationError"
            }
            Self::InvalidArgument(_) => "InvalidArgument",
            Self::PacketTooShort { .. } | Self::MalformedPacket { .. } => "MalformedPacket",
            Self::AuthenticationFailure => "AuthenticationFailure",
            Self::PeerIdMismatch { .. } => "PeerIdMismatch",
            Self::CryptoOperation { .. } => "CryptoOperationError",
        }
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::too_short(25, 7);
        assert!(err.to_string().contains("25"));
        assert!(err.to_string().contains('7'));

        let err = CoreError::unsupported_cipher("BF-CBC");
        assert!(err.to_string().contains("BF-CBC"));

        let err = CoreError::KeyNotInstalled {
            direction: Direction::Decrypt,
        };
        assert!(err.to_string().contains("decrypt"));
    }

    #[test]
    fn test_error_classification() {
        assert!(CoreError::unsupported_cipher("x").is_configuration_error());
        assert!(CoreError::key_length("cipher key", 32, 16).is_configuration_error());
        assert!(!CoreError::AuthenticationFailure.is_configuration_error());

        assert!(CoreError::too_short(21, 3).is_malformed());
        assert!(CoreError::too_short(21, 3).is_drop_worthy());
        assert!(!CoreError::too_short(21, 3).is_suspicious());

        assert!(CoreError::AuthenticationFailure.is_drop_worthy());
        assert!(CoreError::AuthenticationFailure.is_suspicious());

        let mismatch = CoreError::PeerIdMismatch {
            expected: PeerId::new(1).unwrap(),
            received: PeerId::new(2).unwrap(),
        };
        assert!(mismatch.is_drop_worthy());
        assert!(mismatch.is_suspicious());

        let op = CoreError::CryptoOperation { context: "seal" };
        assert!(!op.is_drop_worthy());
        assert!(!op.is_configuration_error());
    }

    #[test]
    fn test_error_kind_names() {
        assert_eq!(CoreError::unsupported_cipher("x").kind(), "ConfigurationError");
        assert_eq!(CoreError::too_short(21, 0).kind(), "MalformedPacket");
        assert_eq!(CoreError::malformed("type").kind(), "MalformedPacket");
        assert_eq!(CoreError::AuthenticationFailure.kind(), "AuthenticationFailure");
        assert_eq!(
            CoreError::from(CommonError::out_of_range("peer_id", 1 << 24, 0xFF_FFFF)).kind(),
            "InvalidArgument"
        );
    }

    #[test]
    fn test_common_error_conversion() {
        let common = CommonError::out_of_range("key_id", 40, 31);
        let core: CoreError = common.into();
        assert!(core.is_invalid_argument());
    }
}
