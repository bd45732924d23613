// ============================================
// File: crates/datachan-cli/src/error.rs
// ============================================
//! # CLI Error Types
//!
//! ## Last Modified
//! v0.1.0 - Initial CLI error definitions

use thiserror::Error;

use datachan_common::error::CommonError;
use datachan_core::error::CoreError;

/// Result type for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
pub enum CliError {
    /// Config file could not be read or parsed.
    #[error("Failed to load configuration from '{path}': {reason}")]
    ConfigLoad {
        /// Config file path
        path: String,
        /// Underlying read or parse error
        reason: String,
    },

    /// Config parsed but a value is unusable.
    #[error("Invalid configuration: {field} - {reason}")]
    ConfigInvalid {
        /// Dotted path of the offending field
        field: String,
        /// What is wrong with it
        reason: String,
    },

    /// Key string is not valid base64.
    #[error("Failed to decode {field}: {reason}")]
    KeyDecode {
        /// Dotted path of the key field (never the key itself)
        field: String,
        /// Decoder error
        reason: String,
    },

    /// Command-line input is unusable.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// What is wrong with it
        reason: String,
    },

    /// Shared type error.
    #[error(transparent)]
    Common(#[from] CommonError),

    /// Codec error.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Creates a `ConfigLoad` error.
    pub fn config_load(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConfigLoad {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a `ConfigInvalid` error.
    pub fn config_invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a `KeyDecode` error.
    pub fn key_decode(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::KeyDecode {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates an `InvalidInput` error.
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Returns the wrapped codec error, if any.
    #[must_use]
    pub const fn core(&self) -> Option<&CoreError> {
        match self {
            Self::Core(e) => Some(e),
            _ => None,
        }
    }

    /// Returns `true` for problems with the config file.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigLoad { .. } | Self::ConfigInvalid { .. } | Self::KeyDecode { .. }
        )
    }

    /// Category name printed on failure.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ConfigLoad { .. } | Self::ConfigInvalid { .. } | Self::KeyDecode { .. } => {
                "ConfigurationError"
            }
            Self::InvalidInput { .. } | Self::Common(_) => "InvalidArgument",
            Self::Core(e) => e.kind(),
            Self::Io(_) => "IoError",
        }
    }
}
