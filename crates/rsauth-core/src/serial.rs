//! Device serial numbers in packed binary-coded decimal.
//!
//! A serial is entered as a decimal string and stored as big-endian packed
//! BCD: every byte carries two decimal digits, tens in the high nibble and
//! units in the low nibble.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::TokenError;

/// Pack a value in `0..100` into a single BCD byte.
///
/// Values of 100 or more are outside the single-byte domain; callers only
/// pass calendar fields and `% 100` remainders.
#[must_use]
pub const fn bcd_byte(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}

/// A device serial held as packed BCD bytes.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Serial {
    bytes: Vec<u8>,
}

impl Serial {
    /// Wrap raw BCD bytes as read back from the secret store.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }

    /// Parse a decimal serial into packed BCD.
    ///
    /// Digit pairs are taken from the least significant end, so an odd
    /// digit count gains a leading zero nibble. Zero yields no bytes at all.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Format` if `text` is empty, non-numeric, or
    /// does not fit in a `u64`.
    pub fn decode(text: &str) -> Result<Self, TokenError> {
        let mut n: u64 = text
            .parse()
            .map_err(|e| TokenError::Format(format!("serial {text:?}: {e}")))?;

        let mut bytes = Vec::new();
        while n > 0 {
            // n % 100 < 100, always fits in u8.
            #[allow(clippy::cast_possible_truncation)]
            let pair = (n % 100) as u8;
            bytes.push(bcd_byte(pair));
            n /= 100;
        }
        bytes.reverse();
        Ok(Self { bytes })
    }

    /// Render the serial as decimal text, two digits per byte.
    ///
    /// Leading zeros are kept. A nibble above 9 is printed as its full
    /// decimal value.
    #[must_use]
    pub fn encode(&self) -> String {
        self.bytes
            .iter()
            .map(|byte| format!("{}{}", byte >> 4, byte & 0x0F))
            .collect()
    }

    /// The packed BCD bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of packed bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` for the zero serial.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for Serial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Serial").field(&self.encode()).finish()
    }
}

impl fmt::Display for Serial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}
