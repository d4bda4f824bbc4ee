//! Clock sources and UTC calendar decomposition.

use chrono::{DateTime, Datelike, Timelike, Utc};

/// Source of the current instant.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant, for fixtures and replays.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Calendar fields of an instant, always taken in UTC.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeFields {
    /// Proleptic Gregorian year.
    pub year: i32,
    /// Month, `1..=12`.
    pub month: u8,
    /// Day of month, `1..=31`.
    pub day: u8,
    /// Hour, `0..=23`.
    pub hour: u8,
    /// Minute, `0..=59`.
    pub minute: u8,
}

impl TimeFields {
    /// Decompose `instant` into UTC calendar fields. Seconds are dropped.
    #[must_use]
    // chrono bounds month/day/hour/minute well below 256.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_utc(instant: &DateTime<Utc>) -> Self {
        Self {
            year: instant.year(),
            month: instant.month() as u8,
            day: instant.day() as u8,
            hour: instant.hour() as u8,
            minute: instant.minute() as u8,
        }
    }
}

impl From<DateTime<Utc>> for TimeFields {
    fn from(instant: DateTime<Utc>) -> Self {
        Self::from_utc(&instant)
    }
}
