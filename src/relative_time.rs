//! # Relative Time Module
//!
//! Turns "N units ago" publish strings into absolute local timestamps
//!
//! ## Key Components
//! - [`parse_published_at`] - Resolve a relative time string against "now"
//! - [`shift_months`] - Calendar-month arithmetic shared with period resolution

use chrono::{Duration, Months, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Leading integer of the count token: "3" in "3", "3rd" or "+3"
    static ref LEADING_INT: Regex = Regex::new(r"^[+-]?\d+").expect("valid leading integer pattern");
}

/// Shift a timestamp by whole calendar months (negative moves back).
/// Days past the end of the target month clamp to its last day.
pub fn shift_months(at: NaiveDateTime, months: i64) -> Option<NaiveDateTime> {
    let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months < 0 {
        at.checked_sub_months(magnitude)
    } else {
        at.checked_add_months(magnitude)
    }
}

fn leading_integer(token: &str) -> Option<i64> {
    LEADING_INT.find(token)?.as_str().parse().ok()
}

/// Parse strings like "14 years ago" or "3 weeks ago" relative to `now`.
///
/// Fails open: fewer than three tokens, a non-numeric count or an
/// unrecognized unit all return `now` unchanged.
pub fn parse_published_at(published_at: &str, now: NaiveDateTime) -> NaiveDateTime {
    let lowered = published_at.to_lowercase();
    let parts: Vec<&str> = lowered.split_whitespace().collect();

    if parts.len() < 3 {
        return now;
    }

    let Some(value) = leading_integer(parts[0]) else {
        return now;
    };
    let unit = parts[1];

    let shifted = if unit.starts_with("year") {
        value.checked_mul(12).and_then(|months| shift_months(now, -months))
    } else if unit.starts_with("month") {
        shift_months(now, -value)
    } else if unit.starts_with("week") {
        value
            .checked_mul(7)
            .and_then(Duration::try_days)
            .and_then(|d| now.checked_sub_signed(d))
    } else if unit.starts_with("day") {
        Duration::try_days(value).and_then(|d| now.checked_sub_signed(d))
    } else if unit.starts_with("hour") {
        Duration::try_hours(value).and_then(|d| now.checked_sub_signed(d))
    } else if unit.starts_with("minute") {
        Duration::try_minutes(value).and_then(|d| now.checked_sub_signed(d))
    } else {
        Some(now)
    };

    shifted.unwrap_or(now)
}
