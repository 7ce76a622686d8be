//! Lenient date handling for data-store values.
//!
//! RULE: an unparseable value is `None`, never an error. Callers treat
//! `None` exactly like a missing field.

use crate::types::{DayCount, MILLIS_PER_DAY};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Utc};

const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse an ISO-8601 style timestamp or date.
///
/// Accepts RFC 3339, Postgres-style `YYYY-MM-DD HH:MM:SS[.f]+TZ`,
/// offset-less date-times (taken as UTC) and bare dates (UTC midnight).
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Calendar date of a parsed value, in UTC.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    parse_instant(raw).map(|dt| dt.date_naive())
}

/// Whole days from `earlier` to `later`, floored. Negative when
/// `earlier` is actually in the future.
pub fn days_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> DayCount {
    (later - earlier).num_milliseconds().div_euclid(MILLIS_PER_DAY)
}

/// The anniversary of `birthday` in `year`. A 29 February birthday
/// rolls over to 1 March outside leap years.
pub fn anniversary_in(birthday: NaiveDate, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, birthday.month(), birthday.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
}

/// Next occurrence of `birthday` on or after `today`. The birth year
/// is ignored, so placeholder years are harmless.
pub fn next_birthday(birthday: NaiveDate, today: NaiveDate) -> Option<NaiveDate> {
    let this_year = anniversary_in(birthday, today.year())?;
    if this_year >= today {
        Some(this_year)
    } else {
        anniversary_in(birthday, today.year() + 1)
    }
}

/// First instant of `year`-`month`, UTC.
pub fn month_start(year: i32, month: u32) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// `(year, month)` shifted back by `months_back` calendar months.
pub fn shift_month(year: i32, month: u32, months_back: u32) -> (i32, u32) {
    let index = year * 12 + month as i32 - 1 - months_back as i32;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

/// `date + days`, saturating on overflow.
pub fn add_days(date: NaiveDate, days: DayCount) -> NaiveDate {
    Duration::try_days(days)
        .and_then(|span| date.checked_add_signed(span))
        .unwrap_or(NaiveDate::MAX)
}
