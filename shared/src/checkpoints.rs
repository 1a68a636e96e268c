//! Checkpoint resolver and status classification
//!
//! Checkpoints may arrive unsorted; every lookup sorts by end date first.

use crate::dates::week_end;
use crate::models::{FatCheckpoint, Settings, WeightCheckpoint};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Slack above a checkpoint ceiling before the short trend is flagged `bad`.
pub const TREND_TOLERANCE_KG: f64 = 0.5;

/// A value's position relative to a `[low, high]` range
///
/// Below the floor is only a warning; above the ceiling is a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeStatus {
    Ok,
    Warn,
    High,
}

/// Short-trend status against the nearest checkpoint ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendStatus {
    Ok,
    Warn,
    Bad,
}

/// A calendar-anchored target range
pub trait TargetRange {
    fn end_date(&self) -> NaiveDate;
    fn low(&self) -> f64;
    fn high(&self) -> f64;
}

impl TargetRange for WeightCheckpoint {
    fn end_date(&self) -> NaiveDate {
        self.end_date
    }
    fn low(&self) -> f64 {
        self.low_kg
    }
    fn high(&self) -> f64 {
        self.high_kg
    }
}

impl TargetRange for FatCheckpoint {
    fn end_date(&self) -> NaiveDate {
        self.end_date
    }
    fn low(&self) -> f64 {
        self.low_pct
    }
    fn high(&self) -> f64 {
        self.high_pct
    }
}

fn sorted_by_end<T: TargetRange>(checkpoints: &[T]) -> Vec<&T> {
    let mut sorted: Vec<&T> = checkpoints.iter().collect();
    sorted.sort_by_key(|c| c.end_date());
    sorted
}

/// Checkpoint governing the Sunday-to-Saturday week containing `date`, or
/// the nearest one still ahead. `None` once every checkpoint has elapsed.
pub fn find_active<T: TargetRange>(checkpoints: &[T], date: NaiveDate) -> Option<&T> {
    let end = week_end(date);
    sorted_by_end(checkpoints)
        .into_iter()
        .find(|c| c.end_date() >= end)
}

/// Active weight checkpoint for the week containing `date`
pub fn find_active_checkpoint(settings: &Settings, date: NaiveDate) -> Option<&WeightCheckpoint> {
    find_active(&settings.checkpoints, date)
}

/// Active body-fat checkpoint for the week containing `date`
pub fn find_active_fat_checkpoint(settings: &Settings, date: NaiveDate) -> Option<&FatCheckpoint> {
    find_active(&settings.fat_checkpoints, date)
}

/// First checkpoint ending on or after `date`, else the last one.
///
/// Unlike [`find_active`] this compares against the date itself, not its
/// week end, and never gives up while any checkpoint exists.
pub fn nearest_checkpoint<T: TargetRange>(date: NaiveDate, checkpoints: &[T]) -> Option<&T> {
    let sorted = sorted_by_end(checkpoints);
    sorted
        .iter()
        .find(|c| c.end_date() >= date)
        .or_else(|| sorted.last())
        .copied()
}

/// Classify `value` against `[low, high]`
pub fn status_vs_range(value: f64, low: f64, high: f64) -> RangeStatus {
    if value >= low && value <= high {
        RangeStatus::Ok
    } else if value > high {
        RangeStatus::High
    } else {
        RangeStatus::Warn
    }
}

/// Classify a weight against a checkpoint's range
pub fn status_vs_checkpoint<T: TargetRange>(value: f64, checkpoint: &T) -> RangeStatus {
    status_vs_range(value, checkpoint.low(), checkpoint.high())
}

/// Short moving-average trend against the nearest checkpoint ceiling with a
/// [`TREND_TOLERANCE_KG`] warning band. `None` without any checkpoint.
pub fn status_for(date: NaiveDate, short_trend_kg: f64, checkpoints: &[WeightCheckpoint]) -> Option<TrendStatus> {
    let checkpoint = nearest_checkpoint(date, checkpoints)?;
    let status = if short_trend_kg <= checkpoint.high_kg {
        TrendStatus::Ok
    } else if short_trend_kg <= checkpoint.high_kg + TREND_TOLERANCE_KG {
        TrendStatus::Warn
    } else {
        TrendStatus::Bad
    };
    Some(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn cp(end: &str, low: f64, high: f64) -> WeightCheckpoint {
        WeightCheckpoint {
            end_date: d(end),
            low_kg: low,
            high_kg: high,
        }
    }

    fn settings_with(checkpoints: Vec<WeightCheckpoint>) -> Settings {
        Settings {
            checkpoints,
            ..Settings::default()
        }
    }

    #[rstest]
    #[case(21.0, RangeStatus::Ok)]
    #[case(20.0, RangeStatus::Ok)]
    #[case(22.0, RangeStatus::Ok)]
    #[case(23.0, RangeStatus::High)]
    #[case(19.0, RangeStatus::Warn)]
    fn test_status_vs_range(#[case] value: f64, #[case] expected: RangeStatus) {
        assert_eq!(status_vs_range(value, 20.0, 22.0), expected);
    }

    #[test]
    fn test_active_checkpoint_uses_week_end() {
        // 2025-09-15 is a Monday; its week ends Saturday 2025-09-20
        let settings = settings_with(vec![
            cp("2025-09-27", 79.0, 79.5),
            cp("2025-09-17", 80.0, 80.5),
            cp("2025-09-12", 81.5, 82.0),
        ]);
        let active = find_active_checkpoint(&settings, d("2025-09-15")).unwrap();
        assert_eq!(active.end_date, d("2025-09-27"));
    }

    #[test]
    fn test_active_checkpoint_same_week() {
        let settings = settings_with(vec![cp("2025-09-20", 80.0, 80.5), cp("2025-09-27", 79.0, 79.5)]);
        let active = find_active_checkpoint(&settings, d("2025-09-14")).unwrap();
        assert_eq!(active.end_date, d("2025-09-20"));
    }

    #[test]
    fn test_active_checkpoint_none_when_all_elapsed() {
        let settings = settings_with(vec![cp("2025-09-12", 81.5, 82.0)]);
        assert!(find_active_checkpoint(&settings, d("2025-10-01")).is_none());
        assert!(find_active_checkpoint(&settings_with(vec![]), d("2025-10-01")).is_none());
    }

    #[test]
    fn test_active_fat_checkpoint() {
        let settings = Settings {
            fat_checkpoints: vec![FatCheckpoint {
                end_date: d("2025-10-04"),
                low_pct: 20.0,
                high_pct: 21.0,
            }],
            ..Settings::default()
        };
        let active = find_active_fat_checkpoint(&settings, d("2025-09-29")).unwrap();
        assert_eq!(status_vs_checkpoint(21.5, active), RangeStatus::High);
        assert!(find_active_fat_checkpoint(&settings, d("2025-10-05")).is_none());
    }

    #[test]
    fn test_nearest_checkpoint_falls_back_to_last() {
        let cps = vec![cp("2025-09-17", 80.0, 80.5), cp("2025-09-12", 81.5, 82.0)];
        assert_eq!(nearest_checkpoint(d("2025-09-13"), &cps).unwrap().end_date, d("2025-09-17"));
        assert_eq!(nearest_checkpoint(d("2025-12-01"), &cps).unwrap().end_date, d("2025-09-17"));
        assert!(nearest_checkpoint::<WeightCheckpoint>(d("2025-12-01"), &[]).is_none());
    }

    #[rstest]
    #[case(80.5, TrendStatus::Ok)]
    #[case(80.75, TrendStatus::Warn)]
    #[case(81.0, TrendStatus::Warn)]
    #[case(81.01, TrendStatus::Bad)]
    fn test_status_for_tolerance_band(#[case] mm3: f64, #[case] expected: TrendStatus) {
        let cps = vec![cp("2025-09-17", 80.0, 80.5)];
        assert_eq!(status_for(d("2025-09-15"), mm3, &cps), Some(expected));
    }

    #[test]
    fn test_status_for_without_checkpoints() {
        assert_eq!(status_for(d("2025-09-15"), 80.0, &[]), None);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_active_checkpoint_never_elapsed_when_future_exists(
            offsets in prop::collection::vec(-60i64..60, 1..10),
            query_offset in 0i64..30
        ) {
            let base = d("2025-09-01");
            let cps: Vec<WeightCheckpoint> = offsets
                .iter()
                .map(|o| WeightCheckpoint {
                    end_date: base + chrono::Duration::days(*o),
                    low_kg: 80.0,
                    high_kg: 81.0,
                })
                .collect();
            let settings = settings_with(cps.clone());
            let query = base + chrono::Duration::days(query_offset);
            let end = week_end(query);
            let future: Vec<NaiveDate> = cps.iter().map(|c| c.end_date).filter(|e| *e >= end).collect();

            match find_active_checkpoint(&settings, query) {
                Some(active) => {
                    prop_assert!(active.end_date >= end);
                    prop_assert_eq!(Some(active.end_date), future.iter().min().copied());
                }
                None => prop_assert!(future.is_empty()),
            }
        }
    }
}
