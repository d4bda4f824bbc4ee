//! The secret-store capability.
//!
//! A store keeps exactly two opaque byte buffers, the packed serial and the
//! raw seed. Writing `None` deletes; writing `Some` creates or updates.

use std::collections::HashMap;
use std::fmt;

use rsauth_core::SecretBuffer;

use crate::KeychainError;

/// Keys a store understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StoreKey {
    /// Packed BCD serial.
    Serial,
    /// Raw seed bytes.
    Seed,
}

impl StoreKey {
    /// Every key, in a stable order.
    pub const ALL: [Self; 2] = [Self::Serial, Self::Seed];

    /// Name of the entry in the backing store.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Serial => "serial",
            Self::Seed => "seed",
        }
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyed persistence for credential bytes.
///
/// Implementations report backend failures as errors; [`crate::Keychain`]
/// turns them into "absent" so the token path only ever sees present or
/// absent values.
pub trait SecretStore {
    /// Read the value for `key`, `None` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns a `KeychainError` if the backend cannot be read.
    fn get(&self, key: StoreKey) -> Result<Option<SecretBuffer>, KeychainError>;

    /// Create, update (`Some`) or delete (`None`) the value for `key`.
    ///
    /// Deleting a missing value succeeds.
    ///
    /// # Errors
    ///
    /// Returns a `KeychainError` if the backend cannot be written.
    fn set(&mut self, key: StoreKey, value: Option<&[u8]>) -> Result<(), KeychainError>;
}

/// Process-local store. Values are zeroized when replaced or dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<StoreKey, SecretBuffer>,
}

impl MemoryStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SecretStore for MemoryStore {
    fn get(&self, key: StoreKey) -> Result<Option<SecretBuffer>, KeychainError> {
        Ok(self.entries.get(&key).cloned())
    }

    fn set(&mut self, key: StoreKey, value: Option<&[u8]>) -> Result<(), KeychainError> {
        match value {
            Some(bytes) => {
                self.entries.insert(key, SecretBuffer::new(bytes));
            }
            None => {
                self.entries.remove(&key);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_names() {
        assert_eq!(StoreKey::Serial.as_str(), "serial");
        assert_eq!(StoreKey::Seed.to_string(), "seed");
    }

    #[test]
    fn get_missing_is_none() {
        let store = MemoryStore::new();
        assert!(store.get(StoreKey::Seed).unwrap().is_none());
    }

    #[test]
    fn set_creates_then_updates() {
        let mut store = MemoryStore::new();
        store.set(StoreKey::Serial, Some(&[1, 2])).unwrap();
        assert_eq!(store.get(StoreKey::Serial).unwrap().unwrap().expose(), &[1, 2]);

        store.set(StoreKey::Serial, Some(&[3])).unwrap();
        assert_eq!(store.get(StoreKey::Serial).unwrap().unwrap().expose(), &[3]);
    }

    #[test]
    fn set_none_deletes_and_is_idempotent() {
        let mut store = MemoryStore::new();
        store.set(StoreKey::Seed, Some(&[0; 16])).unwrap();
        store.set(StoreKey::Seed, None).unwrap();
        assert!(store.get(StoreKey::Seed).unwrap().is_none());
        store.set(StoreKey::Seed, None).unwrap();
    }

    #[test]
    fn keys_are_independent() {
        let mut store = MemoryStore::new();
        store.set(StoreKey::Serial, Some(&[1])).unwrap();
        assert!(store.get(StoreKey::Seed).unwrap().is_none());
    }
}
