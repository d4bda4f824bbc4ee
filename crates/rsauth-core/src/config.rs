//! Token configuration decoded from the device flags word.
//!
//! The flags word packs the code length and the refresh interval:
//!
//! ```text
//!  15            9 8   6 5         2 1   0
//! +---------------+-----+-----------+-----+
//! |    unused     | dig |  unused   | int |
//! +---------------+-----+-----------+-----+
//! ```
//!
//! `dig + 1` is the digit count and `int == 0` selects the 30-second
//! interval (anything else selects one minute).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::TokenError;

/// Flags word of the supported device class (8 digits, one minute).
pub const DEVICE_FLAGS: u16 = 17369;

/// Longest code the flags word can describe.
pub const MAX_DIGITS: u8 = 8;

const DIGIT_SHIFT: u16 = 6;
const DIGIT_MASK: u16 = 0b111 << DIGIT_SHIFT;
const INTERVAL_SHIFT: u16 = 0;
const INTERVAL_MASK: u16 = 0b11 << INTERVAL_SHIFT;

/// How often the token rolls over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RefreshInterval {
    /// Refresh at every `:00` and `:30` second mark.
    ThirtySeconds,
    /// Refresh at every `:00` second mark.
    OneMinute,
}

impl RefreshInterval {
    /// Interval length in seconds.
    #[must_use]
    pub const fn seconds(self) -> u32 {
        match self {
            Self::ThirtySeconds => 30,
            Self::OneMinute => 60,
        }
    }

    /// Interval as a [`Duration`].
    #[must_use]
    pub const fn duration(self) -> Duration {
        Duration::from_secs(self.seconds() as u64)
    }

    /// Bits cleared from the minute before it enters the time block.
    #[must_use]
    pub(crate) const fn minute_mask(self) -> u8 {
        match self {
            Self::ThirtySeconds => !0b01,
            Self::OneMinute => !0b11,
        }
    }
}

/// Immutable settings for code derivation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawTokenConfig")]
pub struct TokenConfig {
    digit_count: u8,
    refresh_interval: RefreshInterval,
    pin_digits: [u8; MAX_DIGITS as usize],
}

/// Unvalidated shape used for deserialization.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTokenConfig {
    digit_count: u8,
    refresh_interval: RefreshInterval,
    #[serde(default)]
    pin_digits: [u8; MAX_DIGITS as usize],
}

impl TryFrom<RawTokenConfig> for TokenConfig {
    type Error = TokenError;

    fn try_from(raw: RawTokenConfig) -> Result<Self, Self::Error> {
        if raw.pin_digits.iter().any(|d| *d > 9) {
            return Err(TokenError::Format("pin digits must be 0-9".to_owned()));
        }
        let config = Self::new(raw.digit_count, raw.refresh_interval)?;
        Ok(Self {
            pin_digits: raw.pin_digits,
            ..config
        })
    }
}

impl TokenConfig {
    /// Build a config with an all-zero PIN.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Format` if `digit_count` is outside `1..=8`.
    pub fn new(digit_count: u8, refresh_interval: RefreshInterval) -> Result<Self, TokenError> {
        if !(1..=MAX_DIGITS).contains(&digit_count) {
            return Err(TokenError::Format(format!(
                "digit count {digit_count} outside 1..={MAX_DIGITS}"
            )));
        }
        Ok(Self {
            digit_count,
            refresh_interval,
            pin_digits: [0; MAX_DIGITS as usize],
        })
    }

    /// Decode the digit count and interval bit-fields of a flags word.
    ///
    /// Every flags word decodes: three bits plus one always lands in `1..=8`.
    #[must_use]
    pub const fn from_flags(flags: u16) -> Self {
        // (flags & DIGIT_MASK) >> DIGIT_SHIFT is at most 7.
        #[allow(clippy::cast_possible_truncation, clippy::arithmetic_side_effects)]
        let digit_count = ((flags & DIGIT_MASK) >> DIGIT_SHIFT) as u8 + 1;
        let refresh_interval = if (flags & INTERVAL_MASK) >> INTERVAL_SHIFT == 0 {
            RefreshInterval::ThirtySeconds
        } else {
            RefreshInterval::OneMinute
        };
        Self {
            digit_count,
            refresh_interval,
            pin_digits: [0; MAX_DIGITS as usize],
        }
    }

    /// Mix a personal PIN into the code.
    ///
    /// `pin` is up to eight decimal digits; missing positions stay zero.
    /// Each PIN digit is added to the matching code position without
    /// wrapping, so a position can exceed 9.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Format` if `pin` is longer than eight characters
    /// or contains a non-digit.
    pub fn with_pin(self, pin: &str) -> Result<Self, TokenError> {
        if pin.chars().count() > usize::from(MAX_DIGITS) {
            return Err(TokenError::Format(format!(
                "pin longer than {MAX_DIGITS} digits"
            )));
        }
        let mut pin_digits = [0u8; MAX_DIGITS as usize];
        for (slot, ch) in pin_digits.iter_mut().zip(pin.chars()) {
            *slot = ch
                .to_digit(10)
                .and_then(|digit| u8::try_from(digit).ok())
                .ok_or_else(|| TokenError::Format("pin must be decimal digits".to_owned()))?;
        }
        Ok(Self { pin_digits, ..self })
    }

    /// Number of code positions.
    #[must_use]
    pub const fn digit_count(&self) -> u8 {
        self.digit_count
    }

    /// Refresh interval.
    #[must_use]
    pub const fn refresh_interval(&self) -> RefreshInterval {
        self.refresh_interval
    }

    /// Additive PIN offsets, one per position.
    #[must_use]
    pub const fn pin_digits(&self) -> &[u8; MAX_DIGITS as usize] {
        &self.pin_digits
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self::from_flags(DEVICE_FLAGS)
    }
}
