//! Day-log collection helpers: upsert by date and month partitioning

use crate::errors::{EngineError, EngineResult};
use crate::models::DayLog;
use crate::validation::validate_day_log;
use chrono::{Datelike, Duration, NaiveDate};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;

/// Current month document schema version
pub const MONTH_SCHEMA_VERSION: u32 = 1;

/// Insert or replace the log for `log.date`, keeping the collection sorted
pub fn upsert_log(logs: &mut Vec<DayLog>, log: DayLog) -> EngineResult<()> {
    validate_day_log(&log).map_err(EngineError::InvalidLog)?;

    match logs.binary_search_by_key(&log.date, |l| l.date) {
        Ok(idx) => logs[idx] = log,
        Err(idx) => logs.insert(idx, log),
    }
    Ok(())
}

/// Apply `incoming` on top of `existing`; later entries win on the same date.
///
/// `existing` is sorted first so stored collections in any order are accepted.
pub fn merge_logs(mut existing: Vec<DayLog>, incoming: Vec<DayLog>) -> EngineResult<Vec<DayLog>> {
    existing.sort_by_key(|l| l.date);
    existing.dedup_by(|later, earlier| {
        if later.date == earlier.date {
            std::mem::swap(later, earlier);
            true
        } else {
            false
        }
    });
    for log in incoming {
        upsert_log(&mut existing, log)?;
    }
    Ok(existing)
}

/// `YYYY-MM` partition key for a date
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

fn month_key_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{4}-\d{2}$").expect("month key pattern compiles"))
}

/// Accept `YYYY-MM` with a month between 01 and 12
pub fn validate_month_key(month: &str) -> EngineResult<()> {
    let invalid = || EngineError::InvalidMonth(month.to_string());
    if !month_key_pattern().is_match(month) {
        return Err(invalid());
    }
    let mm: u32 = month[5..].parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&mm) {
        return Err(invalid());
    }
    Ok(())
}

/// First and last calendar day of a `YYYY-MM` month
pub fn month_bounds(month: &str) -> EngineResult<(NaiveDate, NaiveDate)> {
    validate_month_key(month)?;
    let invalid = || EngineError::InvalidMonth(month.to_string());
    let year: i32 = month[..4].parse().map_err(|_| invalid())?;
    let mm: u32 = month[5..].parse().map_err(|_| invalid())?;

    let first = NaiveDate::from_ymd_opt(year, mm, 1).ok_or_else(invalid)?;
    let next = if mm == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, mm + 1, 1)
    }
    .ok_or_else(invalid)?;
    Ok((first, next - Duration::days(1)))
}

/// Logs dated inside `month`
pub fn logs_in_month(logs: &[DayLog], month: &str) -> EngineResult<Vec<DayLog>> {
    validate_month_key(month)?;
    Ok(logs
        .iter()
        .filter(|l| month_key(l.date) == month)
        .cloned()
        .collect())
}

/// Persisted document for one month of logs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthPayload {
    pub version: u32,
    pub logs: Vec<DayLog>,
}

impl MonthPayload {
    pub fn new(logs: Vec<DayLog>) -> Self {
        Self {
            version: MONTH_SCHEMA_VERSION,
            logs,
        }
    }

    /// Read a month document in any of its stored shapes: a bare array of
    /// logs, or an object carrying a `logs` array. `None` for anything else.
    pub fn normalize(value: Value) -> Option<Self> {
        let logs = match value {
            Value::Array(_) => value,
            Value::Object(mut map) => match map.remove("logs") {
                Some(logs @ Value::Array(_)) => logs,
                _ => return None,
            },
            _ => return None,
        };
        serde_json::from_value(logs).ok().map(Self::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_upsert_keeps_sorted_and_replaces() {
        let mut logs = Vec::new();
        upsert_log(&mut logs, DayLog::new(d("2025-09-03")).with_night(81.0)).unwrap();
        upsert_log(&mut logs, DayLog::new(d("2025-09-01")).with_night(82.0)).unwrap();
        upsert_log(&mut logs, DayLog::new(d("2025-09-02")).with_night(81.5)).unwrap();
        upsert_log(&mut logs, DayLog::new(d("2025-09-01")).with_morning(81.9)).unwrap();

        let dates: Vec<_> = logs.iter().map(|l| l.date).collect();
        assert_eq!(dates, vec![d("2025-09-01"), d("2025-09-02"), d("2025-09-03")]);
        assert_eq!(logs[0].morning_kg, Some(81.9));
        assert_eq!(logs[0].night_kg, None);
    }

    #[test]
    fn test_upsert_rejects_invalid_log() {
        let mut logs = Vec::new();
        let err = upsert_log(&mut logs, DayLog::new(d("2025-09-01")).with_body_fat(22.0)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidLog(_)));
        assert!(logs.is_empty());
    }

    #[test]
    fn test_merge_logs_later_wins() {
        let existing = vec![
            DayLog::new(d("2025-09-02")).with_night(81.0),
            DayLog::new(d("2025-09-01")).with_night(82.0),
        ];
        let incoming = vec![
            DayLog::new(d("2025-09-02")).with_night(80.5),
            DayLog::new(d("2025-09-03")).with_night(80.4),
        ];
        let merged = merge_logs(existing, incoming).unwrap();
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[1].night_kg, Some(80.5));
    }

    #[rstest]
    #[case("2025-09", true)]
    #[case("2025-12", true)]
    #[case("2025-00", false)]
    #[case("2025-13", false)]
    #[case("2025-9", false)]
    #[case("25-09", false)]
    #[case("2025-09-01", false)]
    #[case("../2025", false)]
    fn test_validate_month_key(#[case] key: &str, #[case] ok: bool) {
        assert_eq!(validate_month_key(key).is_ok(), ok);
    }

    #[test]
    fn test_month_key_and_filter() {
        assert_eq!(month_key(d("2025-09-05")), "2025-09");
        let logs = vec![
            DayLog::new(d("2025-08-31")).with_night(82.0),
            DayLog::new(d("2025-09-01")).with_night(81.8),
        ];
        let september = logs_in_month(&logs, "2025-09").unwrap();
        assert_eq!(september.len(), 1);
        assert!(logs_in_month(&logs, "2025-9").is_err());
    }

    #[rstest]
    #[case("2025-09", "2025-09-01", "2025-09-30")]
    #[case("2025-12", "2025-12-01", "2025-12-31")]
    #[case("2024-02", "2024-02-01", "2024-02-29")]
    fn test_month_bounds(#[case] month: &str, #[case] first: &str, #[case] last: &str) {
        assert_eq!(month_bounds(month).unwrap(), (d(first), d(last)));
    }

    #[test]
    fn test_normalize_month_payload_shapes() {
        let log = json!({"dateISO": "2025-09-01", "nightKg": 81.8});

        let wrapped = MonthPayload::normalize(json!({"version": 1, "logs": [log.clone()]})).unwrap();
        assert_eq!(wrapped.version, MONTH_SCHEMA_VERSION);
        assert_eq!(wrapped.logs.len(), 1);

        let bare = MonthPayload::normalize(json!([log])).unwrap();
        assert_eq!(bare, wrapped);

        assert!(MonthPayload::normalize(json!({"items": []})).is_none());
        assert!(MonthPayload::normalize(json!("2025-09")).is_none());
        assert!(MonthPayload::normalize(json!([{"nightKg": 81.0}])).is_none());
    }
}
