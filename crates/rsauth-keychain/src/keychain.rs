//! Typed credential access on top of a [`SecretStore`].
//!
//! Store failures never reach the caller: reads report "absent" and
//! writes are dropped, both with a `tracing` warning. Values are never
//! logged.

use rsauth_core::{SecretBuffer, Seed, Serial};

use crate::store::{SecretStore, StoreKey};

/// Serial and seed accessors over a store.
#[derive(Debug)]
pub struct Keychain<S> {
    store: S,
}

impl<S: SecretStore> Keychain<S> {
    /// Wrap `store`.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Unwrap into the underlying store.
    pub fn into_inner(self) -> S {
        self.store
    }

    /// Stored serial, if any.
    pub fn serial(&self) -> Option<Serial> {
        self.read(StoreKey::Serial)
            .map(|bytes| Serial::from_bytes(bytes.expose()))
    }

    /// Stored seed, if any.
    pub fn seed(&self) -> Option<Seed> {
        self.read(StoreKey::Seed)
            .map(|bytes| Seed::from_bytes(bytes.expose()))
    }

    /// Store (`Some`) or delete (`None`) the serial.
    pub fn set_serial(&mut self, serial: Option<&Serial>) {
        self.write(StoreKey::Serial, serial.map(Serial::as_bytes));
    }

    /// Store (`Some`) or delete (`None`) the seed.
    pub fn set_seed(&mut self, seed: Option<&Seed>) {
        self.write(StoreKey::Seed, seed.map(Seed::expose));
    }

    /// Delete both credentials.
    pub fn clear(&mut self) {
        for key in StoreKey::ALL {
            self.write(key, None);
        }
    }

    fn read(&self, key: StoreKey) -> Option<SecretBuffer> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(%key, "keychain read failed, treating as absent: {e}");
                None
            }
        }
    }

    fn write(&mut self, key: StoreKey, value: Option<&[u8]>) {
        let present = value.is_some();
        match self.store.set(key, value) {
            Ok(()) => tracing::debug!(%key, present, "keychain entry updated"),
            Err(e) => tracing::warn!(%key, present, "keychain write failed: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::KeychainError;

    /// Store whose backend always fails.
    struct BrokenStore;

    impl SecretStore for BrokenStore {
        fn get(&self, _key: StoreKey) -> Result<Option<SecretBuffer>, KeychainError> {
            Err(KeychainError::Serialization("broken".to_owned()))
        }

        fn set(&mut self, _key: StoreKey, _value: Option<&[u8]>) -> Result<(), KeychainError> {
            Err(KeychainError::Serialization("broken".to_owned()))
        }
    }

    #[test]
    fn serial_and_seed_roundtrip() {
        let mut keychain = Keychain::new(MemoryStore::new());
        let serial = Serial::decode("123456789012").unwrap();
        let seed = Seed::from_bytes(&[7; 16]);

        keychain.set_serial(Some(&serial));
        keychain.set_seed(Some(&seed));

        assert_eq!(keychain.serial(), Some(serial));
        assert_eq!(keychain.seed().unwrap().expose(), &[7; 16]);
    }

    #[test]
    fn clear_removes_both() {
        let mut keychain = Keychain::new(MemoryStore::new());
        keychain.set_serial(Some(&Serial::from_bytes(&[1])));
        keychain.set_seed(Some(&Seed::from_bytes(&[2])));
        keychain.clear();
        assert!(keychain.serial().is_none());
        assert!(keychain.seed().is_none());
    }

    #[test]
    fn set_none_deletes_single_entry() {
        let mut keychain = Keychain::new(MemoryStore::new());
        keychain.set_serial(Some(&Serial::from_bytes(&[1])));
        keychain.set_seed(Some(&Seed::from_bytes(&[2])));
        keychain.set_seed(None);
        assert!(keychain.serial().is_some());
        assert!(keychain.seed().is_none());
    }

    #[test]
    fn store_failures_read_as_absent() {
        let mut keychain = Keychain::new(BrokenStore);
        keychain.set_serial(Some(&Serial::from_bytes(&[1])));
        keychain.clear();
        assert!(keychain.serial().is_none());
        assert!(keychain.seed().is_none());
    }
}
