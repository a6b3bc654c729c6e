//! Timestamp formatting helpers.

use std::fmt::{Display, Write};

use chrono::{Local, NaiveDateTime, TimeZone};
use oxide_facade_core::builder::SqlValue;

/// The `DATETIME` text layout most SQL backends accept.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats milliseconds since the Unix epoch in the local time zone.
///
/// Returns `None` if the instant is out of range or `format` is not a valid
/// `strftime` pattern.
#[must_use]
pub fn format_timestamp(millis: i64, format: &str) -> Option<String> {
    format_timestamp_in(&Local, millis, format)
}

/// Formats milliseconds since the Unix epoch in the given time zone.
///
/// Returns `None` if the instant is out of range or `format` is not a valid
/// `strftime` pattern.
#[must_use]
pub fn format_timestamp_in<Tz>(zone: &Tz, millis: i64, format: &str) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let instant = zone.timestamp_millis_opt(millis).single()?;
    let mut out = String::new();
    write!(out, "{}", instant.format(format)).ok()?;
    Some(out)
}

/// Renders a date-time as a text value in [`DATETIME_FORMAT`].
#[must_use]
pub fn datetime_value(value: &NaiveDateTime) -> SqlValue {
    SqlValue::Text(value.format(DATETIME_FORMAT).to_string())
}
