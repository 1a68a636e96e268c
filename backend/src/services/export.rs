//! Full-state export and import
//!
//! JSON export is the same document the import endpoint accepts, so an
//! export can be re-imported unchanged. CSV export is one row per day log.

use crate::error::ApiError;
use crate::repositories::{DayLogRepository, SettingsRepository};
use crate::services::coach::CoachService;
use crate::services::logs::{check_batch_size, validate_user_key};
use chrono::NaiveDate;
use peso_coach_shared::validation::validate_settings;
use peso_coach_shared::{merge_logs, CoachState, EngineError, WriteSummary};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;

/// One CSV row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayLogCsvRow {
    pub date: NaiveDate,
    pub morning_kg: Option<f64>,
    pub night_kg: Option<f64>,
    pub mean_kg: Option<f64>,
    pub body_fat_pct: Option<f64>,
}

pub struct ExportService;

impl ExportService {
    pub async fn export_json(pool: &PgPool, user: &str) -> Result<CoachState, ApiError> {
        CoachService::state(pool, user).await
    }

    pub async fn export_csv(pool: &PgPool, user: &str) -> Result<String, ApiError> {
        let state = CoachService::state(pool, user).await?;
        Self::logs_to_csv(&state)
    }

    /// Render a state's logs as CSV
    pub fn logs_to_csv(state: &CoachState) -> Result<String, ApiError> {
        let rows: Vec<DayLogCsvRow> = state
            .logs
            .iter()
            .map(|log| DayLogCsvRow {
                date: log.date,
                morning_kg: log.morning_kg,
                night_kg: log.night_kg,
                mean_kg: log.mean_weight_kg(),
                body_fat_pct: log.body_fat_pct,
            })
            .collect();
        Self::to_csv(&rows)
    }

    /// Replace a user's logs and settings with `state`
    pub async fn import_json(
        pool: &PgPool,
        user: &str,
        state: CoachState,
        max_logs: usize,
    ) -> Result<WriteSummary, ApiError> {
        validate_user_key(user)?;
        check_batch_size(state.logs.len(), max_logs)?;
        validate_settings(&state.settings).map_err(EngineError::InvalidParams)?;

        let received = state.logs.len();
        let logs = merge_logs(Vec::new(), state.logs)?;

        // Logs and settings are replaced together or not at all
        let mut tx = pool.begin().await?;
        DayLogRepository::replace_all_in(&mut tx, user, &logs)
            .await
            .map_err(ApiError::Internal)?;
        SettingsRepository::put_in(&mut tx, user, &state.settings)
            .await
            .map_err(ApiError::Internal)?;
        tx.commit().await?;

        info!(user = %user, received, stored = logs.len(), "State imported");
        Ok(WriteSummary {
            received,
            stored: logs.len(),
        })
    }

    fn to_csv<T: Serialize>(data: &[T]) -> Result<String, ApiError> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)
                .map_err(|e| ApiError::Internal(anyhow::anyhow!("CSV serialization error: {}", e)))?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("CSV flush error: {}", e)))?;
        String::from_utf8(bytes).map_err(|e| ApiError::Internal(anyhow::anyhow!("CSV encoding error: {}", e)))
    }
}
