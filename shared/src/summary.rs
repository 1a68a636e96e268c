//! Week summary
//!
//! Composes the trend, checkpoint and variation calculators into one snapshot
//! for a reference date. Every field degrades to `None` independently when its
//! inputs are missing.

use crate::checkpoints::{
    find_active_checkpoint, find_active_fat_checkpoint, status_for, status_vs_checkpoint, RangeStatus,
    TrendStatus,
};
use crate::errors::EngineResult;
use crate::models::{DayLog, FatCheckpoint, Settings, WeightCheckpoint};
use crate::moving_average::{latest_mean, moving_average_on_series, rolling_mean_7d, rolling_mean_7d_fat_pct};
use crate::series::nightly_series;
use crate::variation::{delta_week, weekly_variation_fat_pct, weekly_variation_kg};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Latest logged date, or `today` without logs
pub fn reference_date(logs: &[DayLog], today: NaiveDate) -> NaiveDate {
    logs.iter().map(|l| l.date).max().unwrap_or(today)
}

fn latest_log(logs: &[DayLog]) -> Option<&DayLog> {
    // max_by_key keeps the last of equal dates
    logs.iter().max_by_key(|l| l.date)
}

/// Night weight of the latest log, else its morning weight
pub fn pick_current_weight_kg(logs: &[DayLog]) -> Option<f64> {
    latest_log(logs).and_then(|l| l.night_kg.or(l.morning_kg))
}

/// Body fat of the latest log that carries one
pub fn latest_body_fat_pct(logs: &[DayLog]) -> Option<f64> {
    logs.iter()
        .filter(|l| l.body_fat_pct.is_some())
        .max_by_key(|l| l.date)
        .and_then(|l| l.body_fat_pct)
}

/// Dashboard snapshot for the week containing a reference date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendSummary {
    #[serde(rename = "dateISO")]
    pub date: NaiveDate,
    pub short_window: usize,
    pub long_window: usize,
    /// Last value of the short moving average (MM3 by default)
    pub mm_short: Option<f64>,
    /// Last value of the long moving average (MM7 by default)
    pub mm_long: Option<f64>,
    /// Week-over-week change of the long moving average
    pub delta_week: Option<f64>,
    pub trend_status: Option<TrendStatus>,
    pub current_weight_kg: Option<f64>,
    pub active_checkpoint: Option<WeightCheckpoint>,
    pub weight_status: Option<RangeStatus>,
    pub rolling_mean_7d_kg: Option<f64>,
    pub weekly_variation_kg: Option<f64>,
    pub current_body_fat_pct: Option<f64>,
    pub rolling_mean_7d_fat_pct: Option<f64>,
    pub weekly_variation_fat_pct: Option<f64>,
    pub active_fat_checkpoint: Option<FatCheckpoint>,
    pub body_fat_status: Option<RangeStatus>,
}

/// Build the week summary as of `date`.
///
/// Only logs dated on or before `date` contribute. Fails only on an invalid
/// trend window in `settings`.
pub fn summarize(logs: &[DayLog], settings: &Settings, date: NaiveDate) -> EngineResult<TrendSummary> {
    let visible: Vec<DayLog> = logs.iter().filter(|l| l.date <= date).cloned().collect();

    let nightly = nightly_series(&visible);
    let short = moving_average_on_series(&nightly, settings.short_window())?;
    let long = moving_average_on_series(&nightly, settings.long_window())?;
    let mm_short = short.last().map(|p| p.value);
    let mm_long = long.last().map(|p| p.value);

    let current_weight_kg = pick_current_weight_kg(&visible);
    let active_checkpoint = find_active_checkpoint(settings, date).cloned();
    let weight_status = current_weight_kg
        .zip(active_checkpoint.as_ref())
        .map(|(kg, cp)| status_vs_checkpoint(kg, cp));

    let current_body_fat_pct = latest_body_fat_pct(&visible);
    let active_fat_checkpoint = find_active_fat_checkpoint(settings, date).cloned();
    let body_fat_status = current_body_fat_pct
        .zip(active_fat_checkpoint.as_ref())
        .map(|(pct, cp)| status_vs_checkpoint(pct, cp));

    Ok(TrendSummary {
        date,
        short_window: settings.short_window(),
        long_window: settings.long_window(),
        mm_short,
        mm_long,
        delta_week: delta_week(&long),
        trend_status: mm_short.and_then(|mm| status_for(date, mm, &settings.checkpoints)),
        current_weight_kg,
        active_checkpoint,
        weight_status,
        rolling_mean_7d_kg: latest_mean(&rolling_mean_7d(&visible)),
        weekly_variation_kg: weekly_variation_kg(&visible),
        current_body_fat_pct,
        rolling_mean_7d_fat_pct: latest_mean(&rolling_mean_7d_fat_pct(&visible)),
        weekly_variation_fat_pct: weekly_variation_fat_pct(&visible),
        active_fat_checkpoint,
        body_fat_status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EngineError;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, day).unwrap()
    }

    fn descending_logs() -> Vec<DayLog> {
        (1..=14)
            .map(|day| {
                DayLog::new(d(day))
                    .with_morning(82.0 - 0.1 * day as f64)
                    .with_night(82.5 - 0.1 * day as f64)
            })
            .collect()
    }

    #[test]
    fn test_reference_date() {
        assert_eq!(reference_date(&[], d(20)), d(20));
        assert_eq!(reference_date(&descending_logs(), d(30)), d(14));
    }

    #[test]
    fn test_pick_current_weight_prefers_night() {
        let logs = vec![
            DayLog::new(d(2)).with_morning(81.0),
            DayLog::new(d(1)).with_night(82.0),
        ];
        assert_eq!(pick_current_weight_kg(&logs), Some(81.0));
        let latest = pick_current_weight_kg(&descending_logs()).unwrap();
        assert!((latest - 81.1).abs() < 1e-9);
        assert_eq!(pick_current_weight_kg(&[]), None);
    }

    #[test]
    fn test_latest_body_fat_skips_logs_without_it() {
        let logs = vec![
            DayLog::new(d(1)).with_night(82.0).with_body_fat(23.0),
            DayLog::new(d(3)).with_night(81.8),
            DayLog::new(d(2)).with_night(81.9).with_body_fat(22.8),
        ];
        assert_eq!(latest_body_fat_pct(&logs), Some(22.8));
    }

    #[test]
    fn test_summary_with_two_weeks_of_data() {
        let settings = Settings::default();
        let summary = summarize(&descending_logs(), &settings, d(14)).unwrap();

        // Nights 81.3, 81.2, 81.1
        assert!((summary.mm_short.unwrap() - 81.2).abs() < 1e-9);
        assert!((summary.delta_week.unwrap() - (-0.7)).abs() < 1e-9);
        assert!((summary.weekly_variation_kg.unwrap() - (-0.7)).abs() < 1e-9);
        assert!(summary.rolling_mean_7d_kg.is_some());

        // Week of Sun 09-14 ends 09-20: next checkpoint is 09-24 (79.0-79.5)
        let cp = summary.active_checkpoint.as_ref().unwrap();
        assert_eq!(cp.end_date, d(24));
        assert_eq!(summary.weight_status, Some(RangeStatus::High));
        // Nearest checkpoint on or after 09-14 is 09-17 (high 80.5)
        assert_eq!(summary.trend_status, Some(TrendStatus::Bad));

        assert_eq!(summary.current_body_fat_pct, None);
        assert_eq!(summary.body_fat_status, None);
        assert_eq!(summary.rolling_mean_7d_fat_pct, None);
    }

    #[test]
    fn test_summary_ignores_future_logs() {
        let summary = summarize(&descending_logs(), &Settings::default(), d(3)).unwrap();
        assert!((summary.current_weight_kg.unwrap() - 82.2).abs() < 1e-9);
        assert_eq!(summary.weekly_variation_kg, None);
        assert_eq!(summary.rolling_mean_7d_kg, None);
    }

    #[test]
    fn test_summary_without_logs_or_checkpoints() {
        let settings = Settings {
            checkpoints: Vec::new(),
            ..Settings::default()
        };
        let summary = summarize(&[], &settings, d(14)).unwrap();
        assert_eq!(summary.mm_short, None);
        assert_eq!(summary.trend_status, None);
        assert_eq!(summary.active_checkpoint, None);
        assert_eq!(summary.weight_status, None);
    }

    #[test]
    fn test_summary_body_fat_status() {
        let settings = Settings {
            fat_checkpoints: vec![FatCheckpoint {
                end_date: d(20),
                low_pct: 21.0,
                high_pct: 22.0,
            }],
            ..Settings::default()
        };
        let logs = vec![DayLog::new(d(15)).with_night(81.0).with_body_fat(21.5)];
        let summary = summarize(&logs, &settings, d(15)).unwrap();
        assert_eq!(summary.body_fat_status, Some(RangeStatus::Ok));
    }

    #[test]
    fn test_summary_rejects_zero_window() {
        let settings = Settings {
            trend_window_short: Some(0),
            ..Settings::default()
        };
        assert_eq!(
            summarize(&descending_logs(), &settings, d(14)),
            Err(EngineError::InvalidWindow(0))
        );
    }
}
