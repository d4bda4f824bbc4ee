//! Token-code derivation.
//!
//! The current code is derived from the serial, the seed and the UTC
//! minute through a cascade of five AES-128 block encryptions:
//!
//! 1. The minute is masked and the date packed into an 8-byte BCD time
//!    block: `YY CC MM DD hh mm 00 00`.
//! 2. Five key blocks are built from time-block prefixes of length 2, 3,
//!    4, 5 and 8, each padded with `0xAA`, followed by serial bytes 2..6
//!    and four `0xBB` bytes.
//! 3. Each key block is encrypted under the previous ciphertext, the
//!    first one under the seed.
//! 4. A 4-byte big-endian word is read from the last ciphertext at an
//!    offset chosen by the unmasked minute, and its trailing decimal
//!    digits become the code.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use aes::cipher::{BlockEncrypt, KeyInit};
use aes::Aes128;
use chrono::{DateTime, Utc};
use zeroize::Zeroizing;

use crate::clock::{Clock, SystemClock, TimeFields};
use crate::config::{RefreshInterval, TokenConfig};
use crate::memory::SecretBuffer;
use crate::seed::SEED_LEN;
use crate::serial::bcd_byte;
use crate::TokenError;

// ── Constants ───────────────────────────────────────────────────────

/// AES block and key size.
const BLOCK_LEN: usize = 16;

/// Length of the BCD time block.
const TIME_BLOCK_LEN: usize = 8;

/// Time-block prefix lengths, one per cascade step.
const PREFIX_LENS: [usize; 5] = [2, 3, 4, 5, 8];

/// Filler after the time prefix.
const TIME_FILL: u8 = 0xAA;

/// Filler after the serial window.
const SERIAL_FILL: u8 = 0xBB;

/// Serial bytes copied into every key block.
const SERIAL_WINDOW: std::ops::Range<usize> = 2..6;

/// Shortest serial that covers [`SERIAL_WINDOW`].
pub const MIN_SERIAL_LEN: usize = SERIAL_WINDOW.end;

// ── Types ───────────────────────────────────────────────────────────

/// A derived code, one small integer per position.
///
/// A position normally holds a decimal digit, but a non-zero PIN digit is
/// added without wrapping and can push it above 9. Rendering concatenates
/// the decimal form of every position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenCode(Vec<u8>);

impl TokenCode {
    /// The code positions.
    #[must_use]
    pub fn positions(&self) -> &[u8] {
        &self.0
    }

    /// Number of positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the code has no positions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TokenCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|position| write!(f, "{position}"))
    }
}

/// The next instant the code is expected to change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefreshBoundary {
    /// Next `:00` (or `:30`) second mark strictly after the query instant.
    pub next: DateTime<Utc>,
    /// Nominal refresh period.
    pub interval: Duration,
}

impl RefreshBoundary {
    /// Time left until [`Self::next`], zero if `at` is already past it.
    #[must_use]
    pub fn remaining(&self, at: DateTime<Utc>) -> Duration {
        self.next
            .signed_duration_since(at)
            .to_std()
            .unwrap_or_default()
    }
}

/// Derives codes for one serial/seed pair.
///
/// Holds no state between calls apart from the clock. Inputs are checked
/// on every derivation: a serial shorter than [`MIN_SERIAL_LEN`] bytes or
/// a seed that is not [`SEED_LEN`] bytes fails with
/// `TokenError::InsufficientInput`.
pub struct TokenEngine {
    serial: Zeroizing<Vec<u8>>,
    seed: SecretBuffer,
    config: TokenConfig,
    clock: Arc<dyn Clock>,
}

impl TokenEngine {
    /// Engine on the system clock.
    #[must_use]
    pub fn new(serial: &[u8], seed: &[u8], config: TokenConfig) -> Self {
        Self::with_clock(serial, seed, config, Arc::new(SystemClock))
    }

    /// Engine on a caller-supplied clock.
    #[must_use]
    pub fn with_clock(
        serial: &[u8],
        seed: &[u8],
        config: TokenConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            serial: Zeroizing::new(serial.to_vec()),
            seed: SecretBuffer::new(seed),
            config,
            clock,
        }
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &TokenConfig {
        &self.config
    }

    /// Code for the clock's current instant.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::InsufficientInput` for a short serial or a
    /// seed that is not 16 bytes.
    pub fn code(&self) -> Result<TokenCode, TokenError> {
        self.code_at(self.clock.now())
    }

    /// Code for `at`, decomposed in UTC.
    ///
    /// # Errors
    ///
    /// Same as [`Self::code`].
    pub fn code_at(&self, at: DateTime<Utc>) -> Result<TokenCode, TokenError> {
        self.code_for(&TimeFields::from_utc(&at))
    }

    /// Code for already-decomposed calendar fields.
    ///
    /// # Errors
    ///
    /// Same as [`Self::code`].
    pub fn code_for(&self, fields: &TimeFields) -> Result<TokenCode, TokenError> {
        let interval = self.config.refresh_interval();
        let block = self.derive_block(fields)?;

        let offset = word_offset(fields.minute, interval);
        // offset <= 12, so offset + 3 stays inside the 16-byte block.
        let raw = u32::from_be_bytes([
            block[offset],
            block[offset.wrapping_add(1)],
            block[offset.wrapping_add(2)],
            block[offset.wrapping_add(3)],
        ]);

        Ok(render(raw, &self.config))
    }

    /// Next refresh boundary after the clock's current instant.
    #[must_use]
    pub fn next_refresh(&self) -> RefreshBoundary {
        self.refresh_boundary(self.clock.now())
    }

    /// Next refresh boundary strictly after `after`.
    ///
    /// Thirty-second tokens refresh at every `:00` and `:30` second mark,
    /// one-minute tokens at every `:00` mark. The one-minute block only
    /// changes every four minutes, but the code still moves every minute
    /// because the read offset follows the minute.
    #[must_use]
    pub fn refresh_boundary(&self, after: DateTime<Utc>) -> RefreshBoundary {
        let interval = self.config.refresh_interval();
        let step = i64::from(interval.seconds());
        let next = after
            .timestamp()
            .div_euclid(step)
            .checked_add(1)
            .and_then(|n| n.checked_mul(step))
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        RefreshBoundary {
            next,
            interval: interval.duration(),
        }
    }

    /// Run the five-step cascade and return the final ciphertext block.
    fn derive_block(
        &self,
        fields: &TimeFields,
    ) -> Result<Zeroizing<[u8; BLOCK_LEN]>, TokenError> {
        let window: [u8; 4] = self
            .serial
            .get(SERIAL_WINDOW)
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or_else(|| {
                TokenError::InsufficientInput(format!(
                    "serial has {} bytes, need at least {MIN_SERIAL_LEN}",
                    self.serial.len()
                ))
            })?;

        let seed: [u8; BLOCK_LEN] = self.seed.expose().try_into().map_err(|_| {
            TokenError::InsufficientInput(format!(
                "seed has {} bytes, need exactly {SEED_LEN}",
                self.seed.len()
            ))
        })?;

        let time = time_block(fields, self.config.refresh_interval());
        let mut round_key = Zeroizing::new(seed);
        for len in PREFIX_LENS {
            let block = Zeroizing::new(key_block(&time[..len], &window));
            round_key = Zeroizing::new(encrypt_block(&round_key, &block));
        }
        Ok(round_key)
    }
}

impl fmt::Debug for TokenEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenEngine")
            .field("serial_len", &self.serial.len())
            .field("seed", &self.seed)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

// ── Block construction ──────────────────────────────────────────────

/// Pack the masked date into `YY CC MM DD hh mm 00 00`.
fn time_block(fields: &TimeFields, interval: RefreshInterval) -> [u8; TIME_BLOCK_LEN] {
    // rem_euclid(100) is always in 0..100.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::arithmetic_side_effects
    )]
    let (year_low, century) = (
        fields.year.rem_euclid(100) as u8,
        (fields.year / 100).rem_euclid(100) as u8,
    );
    [
        bcd_byte(year_low),
        bcd_byte(century),
        bcd_byte(fields.month),
        bcd_byte(fields.day),
        bcd_byte(fields.hour),
        bcd_byte(fields.minute & interval.minute_mask()),
        0,
        0,
    ]
}

/// Time prefix, `0xAA` fill to 8 bytes, serial window, `0xBB` fill.
fn key_block(prefix: &[u8], serial_window: &[u8; 4]) -> [u8; BLOCK_LEN] {
    let mut block = [TIME_FILL; BLOCK_LEN];
    block[..prefix.len()].copy_from_slice(prefix);
    block[TIME_BLOCK_LEN..12].copy_from_slice(serial_window);
    block[12..].fill(SERIAL_FILL);
    block
}

/// Single-block AES-128 encryption.
fn encrypt_block(key: &[u8; BLOCK_LEN], block: &[u8; BLOCK_LEN]) -> [u8; BLOCK_LEN] {
    let cipher = Aes128::new(key.into());
    let mut output = *block;
    cipher.encrypt_block((&mut output).into());
    output
}

/// Byte offset of the code word inside the final block.
///
/// Thirty-second tokens pick by minute parity and half hour; one-minute
/// tokens by the two low minute bits.
const fn word_offset(minute: u8, interval: RefreshInterval) -> usize {
    match interval {
        RefreshInterval::ThirtySeconds => {
            let mut offset = 0;
            if minute % 2 == 1 {
                offset |= 0b1000;
            }
            if minute >= 30 {
                offset |= 0b0100;
            }
            offset
        }
        RefreshInterval::OneMinute => ((minute & 0b11) as usize) << 2,
    }
}

/// Trailing `digit_count` decimal digits of `raw`, plus the PIN.
fn render(raw: u32, config: &TokenConfig) -> TokenCode {
    let digits: Vec<u8> = raw
        .to_string()
        .bytes()
        .map(|ch| ch.wrapping_sub(b'0'))
        .collect();
    let keep = usize::from(config.digit_count());
    let tail = &digits[digits.len().saturating_sub(keep)..];
    TokenCode(
        tail.iter()
            .zip(config.pin_digits())
            .map(|(digit, pin)| digit.saturating_add(*pin))
            .collect(),
    )
}

// ── Tests ───────────────────────────────────────────────────────────
