//! Token-code vectors.
//!
//! Serial `123456789012` packs to `12 34 56 78 90 12`; the key blocks use
//! bytes `56 78 90 12`.

use chrono::{DateTime, TimeZone, Utc};
use rsauth_core::{RefreshInterval, Serial, TokenConfig, TokenEngine};

const SERIAL: &str = "123456789012";
const ZERO_SEED: [u8; 16] = [0; 16];
const COUNTING_SEED: [u8; 16] = [
    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F,
];

struct Vector {
    seed: &'static [u8; 16],
    instant: (i32, u32, u32, u32, u32),
    digits: u8,
    interval: RefreshInterval,
    code: &'static str,
}

const VECTORS: [Vector; 12] = [
    Vector {
        seed: &ZERO_SEED,
        instant: (2020, 1, 1, 0, 0),
        digits: 8,
        interval: RefreshInterval::OneMinute,
        code: "01622268",
    },
    Vector {
        seed: &ZERO_SEED,
        instant: (2020, 1, 1, 0, 0),
        digits: 8,
        interval: RefreshInterval::ThirtySeconds,
        code: "01622268",
    },
    Vector {
        seed: &ZERO_SEED,
        instant: (2020, 1, 1, 0, 0),
        digits: 6,
        interval: RefreshInterval::OneMinute,
        code: "622268",
    },
    Vector {
        seed: &ZERO_SEED,
        instant: (2020, 1, 1, 0, 1),
        digits: 8,
        interval: RefreshInterval::OneMinute,
        code: "40176764",
    },
    Vector {
        seed: &ZERO_SEED,
        instant: (2020, 1, 1, 0, 3),
        digits: 8,
        interval: RefreshInterval::OneMinute,
        code: "18347453",
    },
    Vector {
        seed: &ZERO_SEED,
        instant: (2020, 1, 1, 0, 31),
        digits: 8,
        interval: RefreshInterval::ThirtySeconds,
        code: "39004294",
    },
    Vector {
        seed: &COUNTING_SEED,
        instant: (2023, 6, 15, 13, 37),
        digits: 8,
        interval: RefreshInterval::OneMinute,
        code: "55400982",
    },
    Vector {
        seed: &COUNTING_SEED,
        instant: (2023, 6, 15, 13, 37),
        digits: 8,
        interval: RefreshInterval::ThirtySeconds,
        code: "67720513",
    },
    Vector {
        seed: &COUNTING_SEED,
        instant: (1999, 12, 31, 23, 59),
        digits: 8,
        interval: RefreshInterval::OneMinute,
        code: "43392933",
    },
    // Raw words below 10^7 yield seven positions.
    Vector {
        seed: &ZERO_SEED,
        instant: (2020, 1, 1, 8, 34),
        digits: 8,
        interval: RefreshInterval::OneMinute,
        code: "7558785",
    },
    Vector {
        seed: &ZERO_SEED,
        instant: (2020, 1, 1, 11, 12),
        digits: 8,
        interval: RefreshInterval::OneMinute,
        code: "7570152",
    },
    Vector {
        seed: &ZERO_SEED,
        instant: (2020, 1, 1, 14, 34),
        digits: 8,
        interval: RefreshInterval::OneMinute,
        code: "5398446",
    },
];

fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0)
        .single()
        .expect("valid instant")
}

fn serial_bytes() -> Vec<u8> {
    Serial::decode(SERIAL).expect("valid serial").as_bytes().to_vec()
}

#[test]
fn token_code_vectors() {
    let serial = serial_bytes();
    for v in &VECTORS {
        let config = TokenConfig::new(v.digits, v.interval).expect("valid config");
        let engine = TokenEngine::new(&serial, v.seed, config);
        let (y, mo, d, h, mi) = v.instant;
        let code = engine.code_at(utc(y, mo, d, h, mi)).expect("derive");
        assert_eq!(
            code.to_string(),
            v.code,
            "mismatch at {:?} ({:?}, {} digits)",
            v.instant,
            v.interval,
            v.digits
        );
    }
}

#[test]
fn reference_conformance_with_device_defaults() {
    let engine = TokenEngine::new(&serial_bytes(), &ZERO_SEED, TokenConfig::default());
    let code = engine.code_at(utc(2020, 1, 1, 0, 0)).expect("derive");
    assert_eq!(code.positions(), &[0, 1, 6, 2, 2, 2, 6, 8]);
    assert_eq!(code.to_string(), "01622268");
}

#[test]
fn pin_is_added_per_position_without_wrapping() {
    let config = TokenConfig::default()
        .with_pin("99999999")
        .expect("valid pin");
    let engine = TokenEngine::new(&serial_bytes(), &ZERO_SEED, config);
    let code = engine.code_at(utc(2020, 1, 1, 0, 0)).expect("derive");
    assert_eq!(code.positions(), &[9, 10, 15, 11, 11, 11, 15, 17]);
    assert_eq!(code.to_string(), "910151111111517");
}
