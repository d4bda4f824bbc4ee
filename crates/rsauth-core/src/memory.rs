//! Zeroizing containers for seed material.
//!
//! [`SecretBuffer`] wraps [`SecretSlice<u8>`] from the `secrecy` crate:
//! - Zero memory on drop
//! - Mask output in `Debug`/`Display` to prevent accidental leakage

use secrecy::{ExposeSecret, SecretSlice};
use std::fmt;

/// Variable-length buffer for sensitive data (seeds, stored credentials).
pub struct SecretBuffer {
    inner: SecretSlice<u8>,
}

impl SecretBuffer {
    /// Copy `data` into a new zeroizing allocation.
    ///
    /// The caller should zeroize the source data after calling this.
    #[must_use]
    pub fn new(data: &[u8]) -> Self {
        Self {
            inner: data.to_vec().into(),
        }
    }

    /// Expose the underlying bytes. Keep the borrow short.
    #[must_use]
    pub fn expose(&self) -> &[u8] {
        self.inner.expose_secret()
    }

    /// Returns the number of bytes in the buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.expose().len()
    }

    /// Returns `true` if the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Clone for SecretBuffer {
    fn clone(&self) -> Self {
        Self::new(self.expose())
    }
}

impl From<Vec<u8>> for SecretBuffer {
    fn from(data: Vec<u8>) -> Self {
        Self { inner: data.into() }
    }
}

impl fmt::Debug for SecretBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretBuffer(***)")
    }
}

impl fmt::Display for SecretBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretBuffer(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expose_returns_original_bytes() {
        let buf = SecretBuffer::new(&[1, 2, 3]);
        assert_eq!(buf.expose(), &[1, 2, 3]);
        assert_eq!(buf.len(), 3);
        assert!(!buf.is_empty());
    }

    #[test]
    fn debug_and_display_are_masked() {
        let buf = SecretBuffer::new(&[0xDE, 0xAD, 0xBE, 0xEF]);
        insta::assert_snapshot!(format!("{buf:?}"), @"SecretBuffer(***)");
        assert_eq!(buf.to_string(), "SecretBuffer(***)");
    }

    #[test]
    fn clone_is_independent_copy() {
        let buf = SecretBuffer::from(vec![9u8; 16]);
        let copy = buf.clone();
        drop(buf);
        assert_eq!(copy.expose(), &[9u8; 16]);
    }
}
