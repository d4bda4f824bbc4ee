//! Error types for `rsauth-keychain`.

use rsauth_core::TokenError;
use thiserror::Error;

/// Errors produced by secret stores and sessions.
#[derive(Debug, Error)]
pub enum KeychainError {
    /// Codec or derivation failure (delegated from rsauth-core).
    #[error(transparent)]
    Token(#[from] TokenError),

    /// I/O error from the filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Store file is corrupt or holds a value that is not hex.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for KeychainError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
