//! # Error Types
//!
//! Errors raised while parsing identities or decoding call data.

use thiserror::Error;

/// Failure to parse a textual address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseAddressError {
    /// Wrong number of hex digits.
    #[error("invalid address length: expected 40 hex digits, got {0}")]
    InvalidLength(usize),

    /// Non-hex characters.
    #[error("invalid address hex: {0}")]
    InvalidHex(String),
}

/// Failure to decode ABI-encoded call data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// Call data shorter than a 4-byte selector.
    #[error("call data too short for a selector: {0} bytes")]
    MissingSelector(usize),

    /// Selector does not match the expected function.
    #[error("selector mismatch: expected 0x{expected}, got 0x{actual}")]
    SelectorMismatch { expected: String, actual: String },

    /// Argument word beyond the end of the data.
    #[error("argument {index} out of bounds ({len} bytes of arguments)")]
    ArgumentOutOfBounds { index: usize, len: usize },

    /// Address word with non-zero padding.
    #[error("argument {index} is not a valid address word")]
    InvalidAddressWord { index: usize },

    /// Dynamic argument offset or length points outside the data.
    #[error("argument {index} has an invalid dynamic offset or length")]
    InvalidDynamicArgument { index: usize },
}
