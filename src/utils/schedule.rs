//! Date and time canonicalisation for event schedules.
//!
//! Dates are stored as `YYYY-MM-DD` in UTC and times as 24-hour `HH:mm`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{DataError, DataResult};

const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

static TWENTY_FOUR_HOUR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01]?\d|2[0-3]):([0-5]\d)$").unwrap());

static TWELVE_HOUR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(0?[1-9]|1[0-2]):([0-5]\d)\s*(am|pm)$").unwrap());

/// Parses a date-like string and returns the UTC calendar date as `YYYY-MM-DD`.
///
/// Instants carrying an offset are shifted to UTC before the date is read;
/// inputs without an offset are taken as UTC. Out-of-range components are
/// rejected rather than rolled over.
pub fn normalize_date(input: &str) -> DataResult<String> {
    let trimmed = input.trim();
    parse_date(trimmed)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .ok_or_else(|| DataError::InvalidDate(trimmed.to_string()))
}

fn parse_date(input: &str) -> Option<NaiveDate> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(input) {
        return Some(instant.with_timezone(&Utc).date_naive());
    }
    if let Ok(instant) = DateTime::parse_from_rfc2822(input) {
        return Some(instant.with_timezone(&Utc).date_naive());
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .map(|naive| naive.date())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
        })
}

/// Converts `HH:mm` or `h:mm AM/PM` into 24-hour `HH:mm`.
pub fn normalize_time(input: &str) -> DataResult<String> {
    let trimmed = input.trim();
    let invalid = || DataError::InvalidTime(trimmed.to_string());

    if let Some(caps) = TWENTY_FOUR_HOUR.captures(trimmed) {
        let hour: u32 = caps[1].parse().map_err(|_| invalid())?;
        return Ok(format!("{:02}:{}", hour, &caps[2]));
    }

    let caps = TWELVE_HOUR.captures(trimmed).ok_or_else(invalid)?;
    let hour: u32 = caps[1].parse().map_err(|_| invalid())?;
    let is_pm = caps[3].eq_ignore_ascii_case("pm");
    let hour = match (hour, is_pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, true) => h + 12,
        (h, false) => h,
    };
    Ok(format!("{:02}:{}", hour, &caps[2]))
}
