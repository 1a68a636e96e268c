//! Input validation functions
//!
//! Plain validators return `Result<(), String>`; callers wrap the message in
//! the error type of their layer.

use crate::models::{DayLog, ProjectionParams, Settings};

/// Validate weight value (in kg)
pub fn validate_weight(weight_kg: f64) -> Result<(), String> {
    if weight_kg.is_nan() || weight_kg.is_infinite() {
        return Err("Weight must be a valid number".to_string());
    }
    if weight_kg < 20.0 {
        return Err("Weight must be at least 20 kg".to_string());
    }
    if weight_kg > 500.0 {
        return Err("Weight must be at most 500 kg".to_string());
    }
    Ok(())
}

/// Validate percentage value (0-100)
pub fn validate_percentage(value: f64) -> Result<(), String> {
    if value.is_nan() || value.is_infinite() {
        return Err("Percentage must be a valid number".to_string());
    }
    if !(0.0..=100.0).contains(&value) {
        return Err("Percentage must be between 0 and 100".to_string());
    }
    Ok(())
}

/// Validate a day log before it is stored.
///
/// A log without any weight reading carries no sample and is rejected.
pub fn validate_day_log(log: &DayLog) -> Result<(), String> {
    if !log.has_weight() {
        return Err(format!("{}: a morning or night weight is required", log.date));
    }
    for kg in [log.morning_kg, log.night_kg].into_iter().flatten() {
        validate_weight(kg).map_err(|e| format!("{}: {}", log.date, e))?;
    }
    if let Some(pct) = log.body_fat_pct {
        validate_percentage(pct).map_err(|e| format!("{}: body fat {}", log.date, e))?;
    }
    Ok(())
}

fn require_positive(name: &str, value: f64) -> Result<(), String> {
    if !value.is_finite() || value <= 0.0 {
        return Err(format!("{} must be a positive number", name));
    }
    Ok(())
}

fn require_finite(name: &str, value: f64) -> Result<(), String> {
    if !value.is_finite() {
        return Err(format!("{} must be a valid number", name));
    }
    Ok(())
}

/// Validate the energy-balance model configuration
pub fn validate_projection_params(params: &ProjectionParams) -> Result<(), String> {
    require_positive("bmr", params.bmr)?;
    require_positive("ffmKg", params.ffm_kg)?;
    require_positive("pal", params.pal)?;
    require_positive("kcalPerKg", params.kcal_per_kg)?;
    require_finite("tdeeDropPerKg", params.tdee_drop_per_kg)?;
    require_finite("phase1.intakeKcal", params.phase1.intake_kcal)?;
    require_finite("phase2.intakeRest", params.phase2.intake_rest)?;
    require_finite("phase2.intakeTraining", params.phase2.intake_training)?;
    if let Some(surplus) = params.weekend_surplus_kcal {
        require_finite("weekendSurplusKcal", surplus)?;
    }

    if !(0.0..=1.0).contains(&params.ffm_fraction) {
        return Err("ffmFraction must be between 0 and 1".to_string());
    }
    if params.phase1.end < params.phase1.start {
        return Err(format!(
            "phase1 ends ({}) before it starts ({})",
            params.phase1.end, params.phase1.start
        ));
    }
    if let Some(end) = params.phase2.end {
        if end < params.phase2.start {
            return Err(format!(
                "phase2 ends ({}) before it starts ({})",
                end, params.phase2.start
            ));
        }
    }
    if let Some(day) = params.phase2.training_days.iter().find(|d| !(1..=7).contains(*d)) {
        return Err(format!("training day {} is outside 1-7 (Mon-Sun)", day));
    }
    Ok(())
}

/// Validate the whole settings document
pub fn validate_settings(settings: &Settings) -> Result<(), String> {
    validate_projection_params(&settings.projection)?;

    for window in [settings.trend_window_short, settings.trend_window_long].into_iter().flatten() {
        if window == 0 {
            return Err("Trend windows must be at least 1".to_string());
        }
    }
    for cp in &settings.checkpoints {
        if cp.low_kg > cp.high_kg {
            return Err(format!("checkpoint {}: lowKg exceeds highKg", cp.end_date));
        }
    }
    for cp in &settings.fat_checkpoints {
        if cp.low_pct > cp.high_pct {
            return Err(format!("fat checkpoint {}: lowPct exceeds highPct", cp.end_date));
        }
    }
    Ok(())
}
