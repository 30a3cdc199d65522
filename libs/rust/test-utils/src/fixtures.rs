//! Test fixtures with sample catalogs.

/// Code expiring at the end of a far-future day.
pub const FUTURE_CODE: &str = "ACT-2099-0001-DATE";
/// Expiry of [`FUTURE_CODE`].
pub const FUTURE_EXPIRY: &str = "2099-12-31";

/// Code with minute precision.
pub const TIMED_CODE: &str = "ACT-2099-0002-TIME";
/// Expiry of [`TIMED_CODE`].
pub const TIMED_EXPIRY: &str = "2099-06-30 12:30";

/// Code with second precision.
pub const SECONDS_CODE: &str = "ACT-2099-0003-SECS";
/// Expiry of [`SECONDS_CODE`].
pub const SECONDS_EXPIRY: &str = "2099-06-30 12:30:45";

/// Code that expired long ago.
pub const PAST_CODE: &str = "ACT-2000-0004-PAST";
/// Expiry of [`PAST_CODE`].
pub const PAST_EXPIRY: &str = "2000-01-01";

/// Catalog JSON holding all fixture codes.
#[must_use]
pub fn sample_catalog_json() -> String {
    catalog_json(&[
        (FUTURE_CODE, FUTURE_EXPIRY),
        (TIMED_CODE, TIMED_EXPIRY),
        (SECONDS_CODE, SECONDS_EXPIRY),
        (PAST_CODE, PAST_EXPIRY),
    ])
}

/// Build catalog JSON (`{"code": "expiry", ...}`) from pairs.
#[must_use]
pub fn catalog_json(entries: &[(&str, &str)]) -> String {
    let map: serde_json::Map<String, serde_json::Value> = entries
        .iter()
        .map(|(code, expiry)| ((*code).to_string(), serde_json::Value::from(*expiry)))
        .collect();
    serde_json::Value::Object(map).to_string()
}
