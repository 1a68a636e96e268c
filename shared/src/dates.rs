//! Calendar helpers
//!
//! Weeks run Sunday to Saturday. Weekday indices for training days use the
//! ISO convention (Monday = 1 ... Sunday = 7).

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Sunday on or before `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

/// Saturday on or after `date`
pub fn week_end(date: NaiveDate) -> NaiveDate {
    week_start(date) + Duration::days(6)
}

/// ISO weekday number, Monday = 1 ... Sunday = 7
pub fn iso_weekday(date: NaiveDate) -> u8 {
    date.weekday().number_from_monday() as u8
}

/// Saturday or Sunday
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Whole calendar days from `earlier` to `later`
pub fn days_between(later: NaiveDate, earlier: NaiveDate) -> i64 {
    (later - earlier).num_days()
}

/// Round to 2 decimal places, the fixed precision of every displayed value
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
