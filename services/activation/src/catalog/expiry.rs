//! Catalog expiry-string parsing.
//!
//! Accepted shapes, all read as wall-clock time in the server's zone:
//! - `YYYY-MM-DD` means that day at 23:59:59
//! - `YYYY-MM-DD HH:MM`
//! - `YYYY-MM-DD HH:MM:SS`

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::error::ActivationError;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parse a catalog expiry in the server's local time zone.
///
/// # Errors
///
/// Returns [`ActivationError::Config`] when the string matches no accepted
/// shape or names a local time skipped by a DST transition.
pub fn parse_expiry(raw: &str) -> Result<DateTime<Utc>, ActivationError> {
    parse_expiry_in(raw, &Local)
}

/// Parse a catalog expiry in an explicit time zone.
///
/// A wall-clock time that occurs twice resolves to the earlier instant.
///
/// # Errors
///
/// See [`parse_expiry`].
pub fn parse_expiry_in<Tz: TimeZone>(raw: &str, tz: &Tz) -> Result<DateTime<Utc>, ActivationError> {
    let naive = parse_naive(raw.trim())
        .ok_or_else(|| ActivationError::config(format!("unparseable expiry {raw:?}")))?;

    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| {
            ActivationError::config(format!("expiry {raw:?} does not exist in the local time zone"))
        })
}

fn parse_naive(raw: &str) -> Option<NaiveDateTime> {
    if raw.contains(' ') {
        return DATE_TIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok());
    }

    let end_of_day = NaiveTime::from_hms_opt(23, 59, 59)?;
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .map(|date| date.and_time(end_of_day))
}
