//! API request and response types

use crate::models::DayLog;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Day log write request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_has_weight"))]
pub struct LogDayRequest {
    #[serde(rename = "dateISO")]
    pub date: NaiveDate,
    #[validate(range(min = 20.0, max = 500.0))]
    #[serde(default)]
    pub morning_kg: Option<f64>,
    #[validate(range(min = 20.0, max = 500.0))]
    #[serde(default)]
    pub night_kg: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0))]
    #[serde(default)]
    pub body_fat_pct: Option<f64>,
}

fn validate_has_weight(request: &LogDayRequest) -> Result<(), ValidationError> {
    if request.morning_kg.is_none() && request.night_kg.is_none() {
        let mut err = ValidationError::new("missing_weight");
        err.message = Some("a morning or night weight is required".into());
        return Err(err);
    }
    Ok(())
}

impl From<LogDayRequest> for DayLog {
    fn from(request: LogDayRequest) -> Self {
        DayLog {
            date: request.date,
            morning_kg: request.morning_kg,
            night_kg: request.night_kg,
            body_fat_pct: request.body_fat_pct,
        }
    }
}

/// `GET /trend` query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrendQuery {
    /// Reference date; defaults to the latest logged date
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// `GET /projection` query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectionQuery {
    /// Used as the start date when no logs exist; defaults to the server date
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

/// Result of a month write or a full import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteSummary {
    /// Logs received in the request
    pub received: usize,
    /// Logs stored for the affected scope after the write
    pub stored: usize,
}
