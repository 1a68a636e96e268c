//! Series builder
//!
//! Turns day logs into date-sorted series. Only dates that have at least one
//! log are included; a later log for the same date replaces an earlier one.

use crate::models::DayLog;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Parallel sorted dates and present-or-absent values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub dates: Vec<NaiveDate>,
    pub values: Vec<Option<f64>>,
}

/// A dated value that is known to be present
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    #[serde(rename = "dateISO")]
    pub date: NaiveDate,
    pub value: f64,
}

impl Series {
    fn from_map(by_date: BTreeMap<NaiveDate, Option<f64>>) -> Self {
        let (dates, values) = by_date.into_iter().unzip();
        Self { dates, values }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, Option<f64>)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }

    /// Only the entries that carry a value, order preserved
    pub fn present(&self) -> Vec<SeriesPoint> {
        self.iter()
            .filter_map(|(date, value)| value.map(|value| SeriesPoint { date, value }))
            .collect()
    }
}

/// Night weight per logged date; absent when that day has no night reading
pub fn nightly_series(logs: &[DayLog]) -> Series {
    let mut by_date = BTreeMap::new();
    for log in logs {
        by_date.insert(log.date, log.night_kg);
    }
    Series::from_map(by_date)
}

/// Mean of morning/night per date; dates with neither are excluded
pub fn mean_series(logs: &[DayLog]) -> Series {
    collect_present(logs, DayLog::mean_weight_kg)
}

/// Body-fat percentage per date; dates without one are excluded
pub fn body_fat_series(logs: &[DayLog]) -> Series {
    collect_present(logs, |log| log.body_fat_pct)
}

fn collect_present(logs: &[DayLog], value_of: impl Fn(&DayLog) -> Option<f64>) -> Series {
    let mut by_date = BTreeMap::new();
    for log in logs {
        if let Some(value) = value_of(log) {
            by_date.insert(log.date, Some(value));
        }
    }
    Series::from_map(by_date)
}
