// ============================================
// File: crates/datachan-common/src/error.rs
// ============================================
//! # Common Error Types
//!
//! ## Creation Reason
//! Foundational error type for input validation shared by the codec and
//! the command-line front end.
//!
//! ## Main Functionality
//! - `CommonError`: Validation failures (range, length, free-form input)
//! - `Result<T>`: Type alias using `CommonError`
//!
//! ## ⚠️ Important Note for Next Developer
//! - Never include key or salt bytes in error messages
//! - Higher crates wrap this type; keep variants few and specific
//!
//! ## Last Modified
//! v0.1.0 - Initial error definitions

use thiserror::Error;

// ============================================
// Result Type Alias
// ============================================

/// Common result type for operations that may fail.
pub type Result<T> = std::result::Result<T, CommonError>;

// ============================================
// CommonError
// ============================================

/// Validation errors shared across datachan crates.
///
/// # Example
/// ```
/// use datachan_common::error::{CommonError, Result};
///
/// fn validate_input(data: &[u8]) -> Result<()> {
///     if data.is_empty() {
///         return Err(CommonError::invalid_input("data", "cannot be empty"));
///     }
///     Ok(())
/// }
///
/// assert!(validate_input(b"").is_err());
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommonError {
    /// Invalid input data provided.
    #[error("Invalid input for '{field}': {reason}")]
    InvalidInput {
        /// Name of the field or parameter
        field: String,
        /// Description of what's wrong
        reason: String,
    },

    /// Data length doesn't match expected size.
    #[error("Invalid length for '{field}': expected {expected}, got {actual}")]
    InvalidLength {
        /// Name of the field or parameter
        field: String,
        /// Expected length in bytes
        expected: usize,
        /// Actual length received
        actual: usize,
    },

    /// Value does not fit the bit width the wire format reserves for it.
    #[error("Value out of range for '{field}': {value} not in [0, {max}]")]
    OutOfRange {
        /// Name of the field
        field: String,
        /// The value that was out of range
        value: u64,
        /// Largest representable value
        max: u64,
    },
}

impl CommonError {
    // ========================================
    // Convenience Constructors
    // ========================================

    /// Creates an `InvalidInput` error.
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates an `InvalidLength` error.
    pub fn invalid_length(field: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::InvalidLength {
            field: field.into(),
            expected,
            actual,
        }
    }

    /// Creates an `OutOfRange` error.
    pub fn out_of_range(field: impl Into<String>, value: u64, max: u64) -> Self {
        Self::OutOfRange {
            field: field.into(),
            value,
            max,
        }
    }
}

// ============================================
// Tests
// ============================================
