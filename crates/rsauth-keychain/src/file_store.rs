//! JSON-file secret store.
//!
//! Values live in `{data_dir}/keychain.json` as lowercase hex strings keyed
//! by [`StoreKey::as_str`]. Every write rewrites the whole file atomically:
//! a fresh `.tmp` file is created owner-only on Unix, written, synced and
//! renamed over the store.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use data_encoding::HEXLOWER_PERMISSIVE;
use rsauth_core::SecretBuffer;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, Zeroizing};

use crate::store::{SecretStore, StoreKey};
use crate::KeychainError;

const KEYCHAIN_FILE: &str = "keychain.json";
const KEYCHAIN_TMP: &str = ".keychain.json.tmp";

/// On-disk shape. Hex strings are wiped when the map is dropped.
#[derive(Default, Serialize, Deserialize)]
#[serde(transparent)]
struct Entries(BTreeMap<String, String>);

impl Drop for Entries {
    fn drop(&mut self) {
        self.0.values_mut().for_each(Zeroize::zeroize);
    }
}

/// Secret store persisted to a JSON file in a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    /// Store rooted at `data_dir`. The directory must exist before the
    /// first write; nothing is touched until then.
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.data_dir.join(KEYCHAIN_FILE)
    }

    /// Read the whole file; a missing file is an empty store.
    fn load(&self) -> Result<Entries, KeychainError> {
        let contents = match fs::read_to_string(self.path()) {
            Ok(contents) => Zeroizing::new(contents),
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Entries::default()),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&contents)?)
    }

    fn save(&self, entries: &Entries) -> Result<(), KeychainError> {
        write_atomic(&self.data_dir, entries)
    }
}

fn write_atomic(data_dir: &Path, entries: &Entries) -> Result<(), KeychainError> {
    let path = data_dir.join(KEYCHAIN_FILE);
    let tmp = data_dir.join(KEYCHAIN_TMP);

    let json = Zeroizing::new(serde_json::to_string_pretty(entries)?);

    // A leftover tmp file may carry any mode; start from a fresh one.
    remove_if_present(&tmp)?;
    let result = write_owner_only(&tmp, json.as_bytes()).and_then(|()| fs::rename(&tmp, &path));
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result.map_err(KeychainError::from)
}

/// Create `path` (which must not exist) readable by the owner only, then
/// write and flush `contents`.
fn write_owner_only(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

fn remove_if_present(path: &Path) -> std::io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

impl SecretStore for FileStore {
    fn get(&self, key: StoreKey) -> Result<Option<SecretBuffer>, KeychainError> {
        let entries = self.load()?;
        entries
            .0
            .get(key.as_str())
            .map(|hex| {
                HEXLOWER_PERMISSIVE
                    .decode(hex.as_bytes())
                    .map(SecretBuffer::from)
                    .map_err(|e| KeychainError::Serialization(format!("{key}: {e}")))
            })
            .transpose()
    }

    fn set(&mut self, key: StoreKey, value: Option<&[u8]>) -> Result<(), KeychainError> {
        let mut entries = self.load()?;
        match value {
            Some(bytes) => {
                if let Some(mut old) = entries
                    .0
                    .insert(key.as_str().to_owned(), HEXLOWER_PERMISSIVE.encode(bytes))
                {
                    old.zeroize();
                }
            }
            None => {
                if let Some(mut old) = entries.0.remove(key.as_str()) {
                    old.zeroize();
                } else if !self.path().exists() {
                    return Ok(());
                }
            }
        }
        self.save(&entries)
    }
}
