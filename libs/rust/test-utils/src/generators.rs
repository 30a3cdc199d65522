//! Shared proptest generators.
//!
//! Expiry strings are produced in the three shapes the catalog accepts:
//! `YYYY-MM-DD`, `YYYY-MM-DD HH:MM` and `YYYY-MM-DD HH:MM:SS`.

use chrono::NaiveDate;
use proptest::prelude::*;

/// Generate activation codes in the issued `ACT-NNNN-NNNN-XXXX` shape.
pub fn activation_code_strategy() -> impl Strategy<Value = String> {
    "ACT-[0-9]{4}-[0-9]{4}-[A-Z]{4}"
}

/// Generate codes that never collide with [`activation_code_strategy`] or the
/// fixture catalogs.
pub fn unknown_code_strategy() -> impl Strategy<Value = String> {
    "UNK-[a-z0-9]{4,16}"
}

/// Generate opaque device identifiers.
pub fn device_id_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_-]{8,40}"
}

/// Generate two distinct device identifiers.
pub fn distinct_devices_strategy() -> impl Strategy<Value = (String, String)> {
    (device_id_strategy(), device_id_strategy()).prop_filter("devices must differ", |(a, b)| a != b)
}

/// Generate a client host, sometimes empty.
pub fn host_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[a-z]{3,12}\\.(com|net|io)",
        "localhost:[0-9]{4}",
    ]
}

/// Generate a user agent string, sometimes empty.
pub fn user_agent_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "Mozilla/5\\.0 \\([A-Za-z0-9; ]{5,30}\\)",
        "[a-z]{3,10}/[0-9]\\.[0-9]",
    ]
}

/// Generate a calendar date between the given years (inclusive).
pub fn date_strategy(from_year: i32, to_year: i32) -> impl Strategy<Value = NaiveDate> {
    (from_year..=to_year, 1u32..=365).prop_filter_map("valid ordinal date", |(year, ordinal)| {
        NaiveDate::from_yo_opt(year, ordinal)
    })
}

/// Generate an expiry string for the given date range in any accepted shape.
pub fn expiry_string_strategy(from_year: i32, to_year: i32) -> impl Strategy<Value = String> {
    (
        date_strategy(from_year, to_year),
        0u8..3,
        0u32..24,
        0u32..60,
        0u32..60,
    )
        .prop_map(|(date, shape, hour, minute, second)| {
            let day = date.format("%Y-%m-%d");
            match shape {
                0 => day.to_string(),
                1 => format!("{day} {hour:02}:{minute:02}"),
                _ => format!("{day} {hour:02}:{minute:02}:{second:02}"),
            }
        })
}

/// Expiry strings safely in the future.
pub fn future_expiry_strategy() -> impl Strategy<Value = String> {
    expiry_string_strategy(2090, 2099)
}

/// Expiry strings safely in the past.
pub fn past_expiry_strategy() -> impl Strategy<Value = String> {
    expiry_string_strategy(1995, 2015)
}
