//! Projection simulator
//!
//! Week-by-week energy-balance integration under a two-phase diet plan.
//!
//! Each simulated day evaluates a calibrated linear BMR on the current
//! fat-free mass, scales it by PAL, subtracts an adaptive decline for weight
//! already lost and accumulates `TDEE - intake`. At the end of each week the
//! balance becomes a mass delta that a body model partitions:
//!
//! - [`WeightOnlyBody`]: total weight plus a single FFM scalar that loses a
//!   fixed fraction of any loss.
//! - [`BodyComposition`]: separate fat and fat-free pools with a loss split
//!   that depends on current adiposity, and a fixed split for gains.
//!
//! The simulation is a pure function of its inputs.

use crate::dates::{is_weekend, iso_weekday, round2, week_end, week_start};
use crate::errors::{EngineError, EngineResult};
use crate::models::{DayLog, ProjectionFatPoint, ProjectionParams, ProjectionPoint, Settings};
use crate::validation::{validate_percentage, validate_projection_params};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Weeks simulated unless phase 2 ends earlier
pub const MAX_WEEKS: usize = 26;

/// Linear BMR model intercept (kcal/day)
pub const BMR_INTERCEPT_KCAL: f64 = 500.0;
/// Linear BMR model slope (kcal/day per kg FFM)
pub const BMR_KCAL_PER_KG_FFM: f64 = 22.0;

/// Physiological floor for fat-free mass (kg)
pub const FFM_FLOOR_KG: f64 = 55.0;
/// Fat mass cannot go negative
pub const FM_FLOOR_KG: f64 = 0.0;

// Adiposity-dependent FFM share of a loss. Calibration constants.
pub const FFM_FRACTION_SLOPE_PER_PCT: f64 = 0.01;
pub const FFM_FRACTION_REFERENCE_FAT_PCT: f64 = 20.0;
pub const FFM_FRACTION_MIN: f64 = 0.1;
pub const FFM_FRACTION_MAX: f64 = 0.5;

/// Share of a weekly gain attributed to fat mass
pub const GAIN_FAT_SHARE: f64 = 0.8;

/// Fallback starting weight when no log carries a weight
pub const FALLBACK_INITIAL_WEIGHT_KG: f64 = 80.0;

/// Linear BMR for a fat-free mass, before calibration
pub fn linear_bmr(ffm_kg: f64) -> f64 {
    BMR_INTERCEPT_KCAL + BMR_KCAL_PER_KG_FFM * ffm_kg
}

/// Ratio of the configured BMR to the linear model at the reference FFM
pub fn calibration_factor(params: &ProjectionParams) -> f64 {
    params.bmr / linear_bmr(params.ffm_kg)
}

/// Convert a weekly energy balance into a mass delta. Positive means loss.
pub fn mass_delta_kg(weekly_balance_kcal: f64, kcal_per_kg: f64) -> f64 {
    weekly_balance_kcal / kcal_per_kg
}

/// FFM share of a loss, shrinking as body fat rises above the reference
pub fn dynamic_ffm_fraction(ffm_fraction: f64, fat_pct: f64) -> f64 {
    (ffm_fraction - FFM_FRACTION_SLOPE_PER_PCT * (fat_pct - FFM_FRACTION_REFERENCE_FAT_PCT))
        .clamp(FFM_FRACTION_MIN, FFM_FRACTION_MAX)
}

/// Prescribed intake for a day, weekend surplus included.
///
/// Phase 1 applies only inside its range and only before phase 2 has
/// started; phase 2 applies from its start date on, and also to any date not
/// covered by phase 1.
pub fn intake_for_day(params: &ProjectionParams, date: NaiveDate) -> f64 {
    let in_phase1 = date >= params.phase1.start && date <= params.phase1.end;
    let in_phase2 = date >= params.phase2.start;

    let mut intake = if in_phase1 && !in_phase2 {
        params.phase1.intake_kcal
    } else if params.phase2.is_training_day(iso_weekday(date)) {
        params.phase2.intake_training
    } else {
        params.phase2.intake_rest
    };

    if let Some(surplus) = params.weekend_surplus_kcal {
        if surplus != 0.0 && is_weekend(date) {
            intake += surplus;
        }
    }
    intake
}

/// A body model advanced one simulated week at a time
pub trait BodyModel {
    type Point;

    fn weight_kg(&self) -> f64;
    fn ffm_kg(&self) -> f64;
    /// Apply a week's mass delta (positive = loss)
    fn apply_week(&mut self, delta_kg: f64, ffm_fraction: f64);
    fn point(&self, week_end: NaiveDate) -> Self::Point;
}

/// Total weight with a single FFM scalar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightOnlyBody {
    pub weight_kg: f64,
    pub ffm_kg: f64,
}

impl BodyModel for WeightOnlyBody {
    type Point = ProjectionPoint;

    fn weight_kg(&self) -> f64 {
        self.weight_kg
    }

    fn ffm_kg(&self) -> f64 {
        self.ffm_kg
    }

    fn apply_week(&mut self, delta_kg: f64, ffm_fraction: f64) {
        let ffm_loss = delta_kg.max(0.0) * ffm_fraction;
        self.ffm_kg = (self.ffm_kg - ffm_loss).max(FFM_FLOOR_KG);
        // Weight keeps falling at the floor; the remainder comes from fat.
        self.weight_kg -= delta_kg;
    }

    fn point(&self, week_end: NaiveDate) -> ProjectionPoint {
        ProjectionPoint {
            date: week_end,
            kg: round2(self.weight_kg),
        }
    }
}

/// Two-compartment body: fat-free mass and fat mass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyComposition {
    pub ffm_kg: f64,
    pub fm_kg: f64,
}

impl BodyComposition {
    pub fn from_weight_and_fat_pct(weight_kg: f64, fat_pct: f64) -> Self {
        let fm_kg = weight_kg * fat_pct / 100.0;
        Self {
            ffm_kg: weight_kg - fm_kg,
            fm_kg,
        }
    }

    pub fn fat_pct(&self) -> f64 {
        100.0 * self.fm_kg / (self.fm_kg + self.ffm_kg)
    }
}

impl BodyModel for BodyComposition {
    type Point = ProjectionFatPoint;

    fn weight_kg(&self) -> f64 {
        self.ffm_kg + self.fm_kg
    }

    fn ffm_kg(&self) -> f64 {
        self.ffm_kg
    }

    fn apply_week(&mut self, delta_kg: f64, ffm_fraction: f64) {
        if delta_kg >= 0.0 {
            let ffm_share = dynamic_ffm_fraction(ffm_fraction, self.fat_pct());
            let ffm_loss = delta_kg * ffm_share;
            let fm_loss = delta_kg - ffm_loss;
            self.ffm_kg = (self.ffm_kg - ffm_loss).max(FFM_FLOOR_KG);
            self.fm_kg = (self.fm_kg - fm_loss).max(FM_FLOOR_KG);
        } else {
            let gain = -delta_kg;
            self.fm_kg += gain * GAIN_FAT_SHARE;
            self.ffm_kg += gain * (1.0 - GAIN_FAT_SHARE);
        }
    }

    fn point(&self, week_end: NaiveDate) -> ProjectionFatPoint {
        ProjectionFatPoint {
            date: week_end,
            fat_pct: round2(self.fat_pct()),
            kg: Some(round2(self.weight_kg())),
        }
    }
}

/// Daily energy expenditure model, calibrated once per run
struct EnergyModel<'a> {
    params: &'a ProjectionParams,
    calibration: f64,
    initial_weight_kg: f64,
}

impl<'a> EnergyModel<'a> {
    fn new(params: &'a ProjectionParams, initial_weight_kg: f64) -> Self {
        Self {
            params,
            calibration: calibration_factor(params),
            initial_weight_kg,
        }
    }

    fn tdee(&self, ffm_kg: f64, weight_kg: f64) -> f64 {
        let bmr = linear_bmr(ffm_kg) * self.calibration;
        let kg_lost = (self.initial_weight_kg - weight_kg).max(0.0);
        bmr * self.params.pal - self.params.tdee_drop_per_kg * kg_lost
    }

    /// Sum of `TDEE - intake` over the 7 days starting at `start`
    fn weekly_balance<B: BodyModel>(&self, start: NaiveDate, body: &B) -> f64 {
        (0..7)
            .map(|offset| {
                let date = start + Duration::days(offset);
                self.tdee(body.ffm_kg(), body.weight_kg()) - intake_for_day(self.params, date)
            })
            .sum()
    }
}

/// Run the weekly loop for any body model
pub fn simulate<B: BodyModel>(
    params: &ProjectionParams,
    mut body: B,
    initial_date: NaiveDate,
) -> EngineResult<Vec<B::Point>> {
    validate_projection_params(params).map_err(EngineError::InvalidParams)?;

    let energy = EnergyModel::new(params, body.weight_kg());
    let mut cursor = week_start(initial_date);
    let mut points = Vec::with_capacity(MAX_WEEKS);

    for _ in 0..MAX_WEEKS {
        let balance = energy.weekly_balance(cursor, &body);
        body.apply_week(mass_delta_kg(balance, params.kcal_per_kg), params.ffm_fraction);
        points.push(body.point(week_end(cursor)));

        cursor += Duration::days(7);
        if params.phase2.end.is_some_and(|end| end < cursor) {
            break;
        }
    }
    Ok(points)
}

fn require_initial_weight(weight_kg: f64) -> EngineResult<()> {
    if !weight_kg.is_finite() || weight_kg <= 0.0 {
        return Err(EngineError::InvalidParams(format!(
            "initial weight must be positive, got {}",
            weight_kg
        )));
    }
    Ok(())
}

/// Weight-only projection starting from the reference FFM
pub fn simulate_projection(
    params: &ProjectionParams,
    initial_weight_kg: f64,
    initial_date: NaiveDate,
) -> EngineResult<Vec<ProjectionPoint>> {
    require_initial_weight(initial_weight_kg)?;
    let body = WeightOnlyBody {
        weight_kg: initial_weight_kg,
        ffm_kg: params.ffm_kg,
    };
    simulate(params, body, initial_date)
}

/// Fat-mass aware projection producing body-fat percentage and weight
pub fn simulate_fat_projection(
    params: &ProjectionParams,
    initial_weight_kg: f64,
    initial_fat_pct: f64,
    initial_date: NaiveDate,
) -> EngineResult<Vec<ProjectionFatPoint>> {
    require_initial_weight(initial_weight_kg)?;
    validate_percentage(initial_fat_pct)
        .map_err(|e| EngineError::InvalidParams(format!("initial body fat: {}", e)))?;
    let body = BodyComposition::from_weight_and_fat_pct(initial_weight_kg, initial_fat_pct);
    simulate(params, body, initial_date)
}

/// When a goal line is first reached by a trajectory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalEta {
    pub label: String,
    pub target: f64,
    #[serde(rename = "dateISO")]
    pub date: Option<NaiveDate>,
}

/// Full projection for a user's current state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionRun {
    #[serde(rename = "initialDateISO")]
    pub initial_date: NaiveDate,
    pub initial_weight_kg: f64,
    pub initial_body_fat_pct: Option<f64>,
    pub weight: Vec<ProjectionPoint>,
    /// Empty when no body-fat sample exists
    pub body_fat: Vec<ProjectionFatPoint>,
    pub goal_etas: Vec<GoalEta>,
    pub fat_goal_etas: Vec<GoalEta>,
}

fn goal_etas(
    values: &[f64],
    labels: Option<&Vec<String>>,
    default_label: impl Fn(f64) -> String,
    trajectory: &[(NaiveDate, f64)],
) -> Vec<GoalEta> {
    values
        .iter()
        .enumerate()
        .map(|(i, &target)| GoalEta {
            label: labels
                .and_then(|l| l.get(i).cloned())
                .unwrap_or_else(|| default_label(target)),
            target,
            date: trajectory
                .iter()
                .find(|(_, value)| *value <= target)
                .map(|(date, _)| *date),
        })
        .collect()
}

/// Project from the latest logged state.
///
/// Starts at the latest logged date (or `today` without logs) from the
/// current weight (or [`FALLBACK_INITIAL_WEIGHT_KG`]). The fat-aware model
/// runs only when a body-fat sample exists and then drives the weight goal
/// estimates.
pub fn run_projection(logs: &[DayLog], settings: &Settings, today: NaiveDate) -> EngineResult<ProjectionRun> {
    let params = &settings.projection;
    let initial_date = crate::summary::reference_date(logs, today);
    let initial_weight_kg =
        crate::summary::pick_current_weight_kg(logs).unwrap_or(FALLBACK_INITIAL_WEIGHT_KG);
    let initial_body_fat_pct = crate::summary::latest_body_fat_pct(logs);

    let weight = simulate_projection(params, initial_weight_kg, initial_date)?;
    let body_fat = match initial_body_fat_pct {
        Some(pct) => simulate_fat_projection(params, initial_weight_kg, pct, initial_date)?,
        None => Vec::new(),
    };

    let weight_trajectory: Vec<(NaiveDate, f64)> = if body_fat.is_empty() {
        weight.iter().map(|p| (p.date, p.kg)).collect()
    } else {
        body_fat
            .iter()
            .filter_map(|p| p.kg.map(|kg| (p.date, kg)))
            .collect()
    };
    let fat_trajectory: Vec<(NaiveDate, f64)> = body_fat.iter().map(|p| (p.date, p.fat_pct)).collect();

    Ok(ProjectionRun {
        initial_date,
        initial_weight_kg,
        initial_body_fat_pct,
        goal_etas: goal_etas(
            &settings.goals.values_kg,
            settings.goals.labels.as_ref(),
            |g| format!("goal {}", g),
            &weight_trajectory,
        ),
        fat_goal_etas: goal_etas(
            &settings.fat_goals.values_pct,
            settings.fat_goals.labels.as_ref(),
            |g| format!("goal {}%", g),
            &fat_trajectory,
        ),
        weight,
        body_fat,
    })
}
