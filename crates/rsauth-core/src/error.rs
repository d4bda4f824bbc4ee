//! Error types for `rsauth-core`.

use thiserror::Error;

/// Errors produced by codecs and token derivation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// Malformed serial, seed, or PIN text at the entry boundary.
    ///
    /// Callers treat this as "no valid value yet" rather than a crash.
    #[error("invalid format: {0}")]
    Format(String),

    /// Serial or seed too short (or too long) for key-block construction.
    ///
    /// Indicates misuse by the caller; never retried.
    #[error("insufficient input: {0}")]
    InsufficientInput(String),
}
