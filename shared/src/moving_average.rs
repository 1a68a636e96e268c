//! Moving-average engine
//!
//! Two deliberately different policies:
//! - [`moving_average_on_series`]: partial-window SMA over the present values
//!   of a sparse series (trend display).
//! - [`rolling_mean_7d`]: all-or-nothing mean over the 7 most recent list
//!   positions (goal tracking). One absent value suppresses the mean.

use crate::errors::{EngineError, EngineResult};
use crate::models::DayLog;
use crate::series::{body_fat_series, mean_series, Series, SeriesPoint};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Positions looked back by the rolling mean, including the current one
pub const ROLLING_WINDOW: usize = 7;

/// A rolling-mean entry; `mean` is absent unless the full window is present
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RollingMeanPoint {
    #[serde(rename = "dateISO")]
    pub date: NaiveDate,
    pub mean: Option<f64>,
}

/// Simple moving average allowing partial windows at the start.
///
/// Entry `i` is the mean of the last `min(i + 1, window)` values.
pub fn simple_moving_average(values: &[f64], window: usize) -> EngineResult<Vec<f64>> {
    if window == 0 {
        return Err(EngineError::InvalidWindow(window));
    }

    Ok((0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let slice = &values[start..=i];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect())
}

/// Moving average over the present values of a sparse series.
///
/// Absent values are dropped before averaging, never zero-filled or carried
/// forward. One output point per present input value.
pub fn moving_average_on_series(series: &Series, window: usize) -> EngineResult<Vec<SeriesPoint>> {
    let present = series.present();
    let values: Vec<f64> = present.iter().map(|p| p.value).collect();
    let averaged = simple_moving_average(&values, window)?;

    Ok(present
        .iter()
        .zip(averaged)
        .map(|(point, value)| SeriesPoint {
            date: point.date,
            value,
        })
        .collect())
}

/// Rolling 7-position mean over every date of `series`.
///
/// The window is positional: a calendar gap between two logged dates does not
/// widen or break it. The mean is reported only when all 7 positions carry a
/// value.
pub fn rolling_mean_7d_on_series(series: &Series) -> Vec<RollingMeanPoint> {
    (0..series.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(ROLLING_WINDOW);
            let window = &series.values[start..=i];
            let mean = if window.len() == ROLLING_WINDOW {
                window
                    .iter()
                    .copied()
                    .sum::<Option<f64>>()
                    .map(|sum| sum / ROLLING_WINDOW as f64)
            } else {
                None
            };
            RollingMeanPoint {
                date: series.dates[i],
                mean,
            }
        })
        .collect()
}

/// Rolling 7-day mean of the combined morning/night weight
pub fn rolling_mean_7d(logs: &[DayLog]) -> Vec<RollingMeanPoint> {
    rolling_mean_7d_on_series(&mean_series(logs))
}

/// Rolling 7-day mean of body-fat percentage
pub fn rolling_mean_7d_fat_pct(logs: &[DayLog]) -> Vec<RollingMeanPoint> {
    rolling_mean_7d_on_series(&body_fat_series(logs))
}

/// Most recent non-absent rolling mean
pub fn latest_mean(points: &[RollingMeanPoint]) -> Option<f64> {
    points.iter().rev().find_map(|p| p.mean)
}
