//! Weekly variation calculator
//!
//! Compares the latest value with the one exactly 7 calendar days earlier.
//! There is no interpolation: without an exact match the result is `None`.

use crate::dates::days_between;
use crate::models::DayLog;
use crate::series::{body_fat_series, mean_series, SeriesPoint};

/// Distinct sample dates required before a weekly variation is reported
pub const MIN_VARIATION_DATES: usize = 8;

const WEEK_DAYS: i64 = 7;

/// Latest value minus the value dated exactly 7 days before it
fn exact_week_delta(points: &[SeriesPoint]) -> Option<f64> {
    let (last, earlier) = points.split_last()?;
    earlier
        .iter()
        .rev()
        .find(|p| days_between(last.date, p.date) == WEEK_DAYS)
        .map(|p| last.value - p.value)
}

/// Weekly variation over a date-sorted series of samples
pub fn weekly_variation(points: &[SeriesPoint]) -> Option<f64> {
    if points.len() < MIN_VARIATION_DATES {
        return None;
    }
    exact_week_delta(points)
}

/// Weekly variation of the combined morning/night weight (kg)
pub fn weekly_variation_kg(logs: &[DayLog]) -> Option<f64> {
    weekly_variation(&mean_series(logs).present())
}

/// Weekly variation of body-fat percentage (percentage points)
pub fn weekly_variation_fat_pct(logs: &[DayLog]) -> Option<f64> {
    weekly_variation(&body_fat_series(logs).present())
}

/// Week-over-week change of an already computed moving-average series
pub fn delta_week(moving_average: &[SeriesPoint]) -> Option<f64> {
    exact_week_delta(moving_average)
}
