//! `rsauth-core`: token-code derivation for hardware-token compatible
//! one-time codes.
//!
//! This crate is the audit target: zero network, zero async, zero storage.
//! Callers hand in already-resolved serial bytes, seed bytes and an instant.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod error;
pub mod memory;

pub mod seed;
pub mod serial;

pub mod clock;
pub mod config;

pub mod token;

pub use clock::{Clock, FixedClock, SystemClock, TimeFields};
pub use config::{RefreshInterval, TokenConfig, DEVICE_FLAGS, MAX_DIGITS};
pub use error::TokenError;
pub use memory::SecretBuffer;
pub use seed::{Seed, SEED_LEN};
pub use serial::Serial;
pub use token::{RefreshBoundary, TokenCode, TokenEngine, MIN_SERIAL_LEN};
