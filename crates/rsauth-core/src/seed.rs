//! Token seeds and their colon-separated hex form.
//!
//! The display form is uppercase hex octets joined by `:`
//! (`00:1F:A2:...`). Length is not checked here; key derivation
//! enforces it.

use std::fmt;

use data_encoding::{HEXUPPER, HEXUPPER_PERMISSIVE};

use crate::memory::SecretBuffer;
use crate::TokenError;

/// Seed length expected by the AES-128 cascade.
pub const SEED_LEN: usize = 16;

const SEPARATOR: char = ':';

/// A raw token seed. Zeroized on drop, masked in `Debug`.
#[derive(Clone)]
pub struct Seed {
    bytes: SecretBuffer,
}

impl Seed {
    /// Wrap raw seed bytes as read back from the secret store.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            bytes: SecretBuffer::new(bytes),
        }
    }

    /// Parse colon-separated hex octets.
    ///
    /// Every segment must be exactly two hex digits; lowercase is accepted.
    /// Empty text is the empty seed, mirroring [`Self::encode`].
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Format` naming the first bad segment.
    pub fn decode(text: &str) -> Result<Self, TokenError> {
        if text.is_empty() {
            return Ok(Self::from_bytes(&[]));
        }
        let mut bytes = Vec::with_capacity(text.len().saturating_add(1) / 3);
        for (index, segment) in text.split(SEPARATOR).enumerate() {
            let decoded = HEXUPPER_PERMISSIVE
                .decode(segment.as_bytes())
                .ok()
                .filter(|octet| octet.len() == 1)
                .ok_or_else(|| {
                    TokenError::Format(format!("seed segment {index} is not a hex octet"))
                })?;
            bytes.extend_from_slice(&decoded);
        }
        Ok(Self {
            bytes: SecretBuffer::from(bytes),
        })
    }

    /// Render as uppercase hex octets joined by `:`.
    #[must_use]
    pub fn encode(&self) -> String {
        self.expose()
            .iter()
            .map(|byte| HEXUPPER.encode(std::slice::from_ref(byte)))
            .collect::<Vec<_>>()
            .join(":")
    }

    /// Expose the raw seed bytes.
    #[must_use]
    pub fn expose(&self) -> &[u8] {
        self.bytes.expose()
    }

    /// Number of seed bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the seed holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seed<{}>(***)", self.len())
    }
}
