//! `rsauth-keychain`: credential storage and the token session for RSAuth.
//!
//! Persists the packed serial and raw seed behind a [`SecretStore`], and
//! exposes a [`TokenSession`] that accepts user-entered text and reads the
//! current code with its refresh countdown.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod error;
pub mod store;

pub mod file_store;

pub mod keychain;
pub mod session;

pub use error::KeychainError;
pub use file_store::FileStore;
pub use keychain::Keychain;
pub use session::{CredentialsDisplay, CurrentCode, TokenSession};
pub use store::{MemoryStore, SecretStore, StoreKey};
