//! Time and date calculation utilities.
//!
//! Character ages use the in-game calendar convention of 30-day months and 360-day years,
//! so `1y` is always exactly 360 days regardless of leap years.

use chrono::{DateTime, Utc};

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;
const SECONDS_PER_MONTH: i64 = 30 * SECONDS_PER_DAY;
const SECONDS_PER_YEAR: i64 = 12 * SECONDS_PER_MONTH;

/// Formats the time elapsed since `since` as a compact age string.
///
/// Components that are zero are omitted, so 400 days is `1y1m10d` while 360 days is just
/// `1y`. Anything below one day, including timestamps in the future, is `today`.
///
/// # Arguments
/// - `since` - Start of the elapsed period, e.g. a character's birthday
/// - `now` - Current UTC timestamp
///
/// # Example
/// ```ignore
/// let birthday = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let now = birthday + chrono::Duration::days(400);
/// assert_eq!(format_age(birthday, now), "1y1m10d");
/// ```
pub fn format_age(since: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let mut seconds = (now - since).num_seconds().max(0);

    let years = seconds / SECONDS_PER_YEAR;
    seconds -= years * SECONDS_PER_YEAR;
    let months = seconds / SECONDS_PER_MONTH;
    seconds -= months * SECONDS_PER_MONTH;
    let days = seconds / SECONDS_PER_DAY;

    let mut age = String::new();
    if years > 0 {
        age.push_str(&format!("{}y", years));
    }
    if months > 0 {
        age.push_str(&format!("{}m", months));
    }
    if days > 0 {
        age.push_str(&format!("{}d", days));
    }

    if age.is_empty() {
        "today".to_string()
    } else {
        age
    }
}

/// Whole days elapsed since `since`, never negative
pub fn whole_days(since: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    ((now - since).num_seconds() / SECONDS_PER_DAY).max(0)
}

/// Formats the date part of a timestamp as `YYYY-MM-DD`
pub fn format_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d").to_string()
}
