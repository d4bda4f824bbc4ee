//! Flags-word decoding fixtures.

use rsauth_core::config::{RefreshInterval, TokenConfig, DEVICE_FLAGS};

#[test]
fn device_class_flags_constant() {
    // 17369 >> 6 = 271; 271 & 0b111 = 7; 7 + 1 = 8 digits.
    // 17369 & 0b11 = 1, nonzero: one-minute interval.
    assert_eq!(DEVICE_FLAGS, 17369);
    let config = TokenConfig::from_flags(DEVICE_FLAGS);
    assert_eq!(config.digit_count(), 8);
    assert_eq!(config.refresh_interval(), RefreshInterval::OneMinute);
}

#[test]
fn every_digit_field_value() {
    for field in 0u16..8 {
        let config = TokenConfig::from_flags(field << 6);
        assert_eq!(u16::from(config.digit_count()), field + 1);
    }
}
