//! Data models for Peso Coach
//!
//! Field names serialize in camelCase with `dateISO`-style date keys so that
//! exported state stays readable by earlier versions of the app.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One calendar day's observations. At most one per date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayLog {
    #[serde(rename = "dateISO")]
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub morning_kg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub night_kg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_fat_pct: Option<f64>,
}

impl DayLog {
    /// Empty log for a date
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            morning_kg: None,
            night_kg: None,
            body_fat_pct: None,
        }
    }

    pub fn with_morning(mut self, kg: f64) -> Self {
        self.morning_kg = Some(kg);
        self
    }

    pub fn with_night(mut self, kg: f64) -> Self {
        self.night_kg = Some(kg);
        self
    }

    pub fn with_body_fat(mut self, pct: f64) -> Self {
        self.body_fat_pct = Some(pct);
        self
    }

    /// True when at least one weight reading is present
    pub fn has_weight(&self) -> bool {
        self.morning_kg.is_some() || self.night_kg.is_some()
    }

    /// Mean of whichever of morning/night are present
    pub fn mean_weight_kg(&self) -> Option<f64> {
        match (self.morning_kg, self.night_kg) {
            (Some(m), Some(n)) => Some((m + n) / 2.0),
            (Some(v), None) | (None, Some(v)) => Some(v),
            (None, None) => None,
        }
    }
}

/// Weight target range valid through a week-ending date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightCheckpoint {
    #[serde(rename = "endDateISO")]
    pub end_date: NaiveDate,
    pub low_kg: f64,
    pub high_kg: f64,
}

/// Body-fat percentage target range valid through a week-ending date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FatCheckpoint {
    #[serde(rename = "endDateISO")]
    pub end_date: NaiveDate,
    pub low_pct: f64,
    pub high_pct: f64,
}

/// Weight goal lines
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goals {
    pub values_kg: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
}

/// Body-fat goal lines
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FatGoals {
    pub values_pct: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
}

/// Flat-intake diet phase with a closed date range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phase1 {
    #[serde(rename = "startISO")]
    pub start: NaiveDate,
    #[serde(rename = "endISO")]
    pub end: NaiveDate,
    pub intake_kcal: f64,
}

/// Intake-by-day-type diet phase, open-ended unless `end` is set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phase2 {
    #[serde(rename = "startISO")]
    pub start: NaiveDate,
    #[serde(rename = "endISO", default, skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
    pub intake_rest: f64,
    pub intake_training: f64,
    /// ISO weekdays, Monday = 1 ... Sunday = 7
    pub training_days: Vec<u8>,
}

impl Phase2 {
    /// Whether `iso_weekday` is a configured training day
    pub fn is_training_day(&self, iso_weekday: u8) -> bool {
        self.training_days.contains(&iso_weekday)
    }
}

fn default_kcal_per_kg() -> f64 {
    7700.0
}

/// Energy-balance model configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionParams {
    /// BMR (kcal/day) at the reference fat-free mass
    pub bmr: f64,
    /// Reference fat-free mass (kg)
    pub ffm_kg: f64,
    /// Physical activity level multiplier
    pub pal: f64,
    #[serde(default = "default_kcal_per_kg")]
    pub kcal_per_kg: f64,
    /// TDEE decline (kcal/day) per kg already lost
    pub tdee_drop_per_kg: f64,
    /// Share of mass loss drawn from fat-free mass
    pub ffm_fraction: f64,
    pub phase1: Phase1,
    pub phase2: Phase2,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekend_surplus_kcal: Option<f64>,
}

/// User settings read by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub goals: Goals,
    #[serde(default)]
    pub fat_goals: FatGoals,
    #[serde(default)]
    pub checkpoints: Vec<WeightCheckpoint>,
    #[serde(default)]
    pub fat_checkpoints: Vec<FatCheckpoint>,
    pub projection: ProjectionParams,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend_window_short: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend_window_long: Option<usize>,
}

/// Default short trend window (MM3)
pub const DEFAULT_TREND_WINDOW_SHORT: usize = 3;
/// Default long trend window (MM7)
pub const DEFAULT_TREND_WINDOW_LONG: usize = 7;

impl Settings {
    pub fn short_window(&self) -> usize {
        self.trend_window_short.unwrap_or(DEFAULT_TREND_WINDOW_SHORT)
    }

    pub fn long_window(&self) -> usize {
        self.trend_window_long.unwrap_or(DEFAULT_TREND_WINDOW_LONG)
    }
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("default settings use valid calendar dates")
}

impl Default for ProjectionParams {
    fn default() -> Self {
        Self {
            bmr: 1724.0,
            ffm_kg: 60.7,
            pal: 1.55,
            kcal_per_kg: default_kcal_per_kg(),
            tdee_drop_per_kg: 25.0,
            ffm_fraction: 0.25,
            phase1: Phase1 {
                start: ymd(2025, 8, 1),
                end: ymd(2025, 9, 17),
                intake_kcal: 1500.0,
            },
            phase2: Phase2 {
                start: ymd(2025, 9, 18),
                end: None,
                intake_rest: 1550.0,
                intake_training: 1800.0,
                training_days: vec![1, 3, 5],
            },
            weekend_surplus_kcal: Some(0.0),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        let checkpoint = |end: NaiveDate, low_kg: f64, high_kg: f64| WeightCheckpoint {
            end_date: end,
            low_kg,
            high_kg,
        };

        Self {
            goals: Goals {
                values_kg: vec![80.0, 78.0, 76.0],
                labels: Some(vec![
                    "goal 80".to_string(),
                    "goal 78".to_string(),
                    "goal 76".to_string(),
                ]),
            },
            fat_goals: FatGoals::default(),
            checkpoints: vec![
                checkpoint(ymd(2025, 9, 12), 81.5, 82.0),
                checkpoint(ymd(2025, 9, 17), 80.0, 80.5),
                checkpoint(ymd(2025, 9, 24), 79.0, 79.5),
                checkpoint(ymd(2025, 10, 1), 78.5, 79.0),
                checkpoint(ymd(2025, 10, 8), 78.0, 78.5),
                checkpoint(ymd(2025, 10, 15), 77.5, 78.0),
                checkpoint(ymd(2025, 10, 22), 77.0, 77.5),
                checkpoint(ymd(2025, 10, 31), 76.0, 76.5),
            ],
            fat_checkpoints: Vec::new(),
            projection: ProjectionParams::default(),
            trend_window_short: None,
            trend_window_long: None,
        }
    }
}

/// One simulated week of the weight-only model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    #[serde(rename = "dateISO")]
    pub date: NaiveDate,
    pub kg: f64,
}

/// One simulated week of the fat-mass aware model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionFatPoint {
    #[serde(rename = "dateISO")]
    pub date: NaiveDate,
    pub fat_pct: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kg: Option<f64>,
}

/// Everything a user owns: logs plus settings. Unit of export/import/backup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachState {
    #[serde(default)]
    pub logs: Vec<DayLog>,
    pub settings: Settings,
}

impl Default for CoachState {
    fn default() -> Self {
        Self {
            logs: Vec::new(),
            settings: Settings::default(),
        }
    }
}
