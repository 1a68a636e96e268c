//! Trend and projection service
//!
//! Loads a user's logs and settings and runs the engine on them.

use crate::error::ApiError;
use crate::repositories::{DayLogRepository, SettingsRepository};
use crate::services::logs::validate_user_key;
use chrono::{NaiveDate, Utc};
use peso_coach_shared::summary::reference_date;
use peso_coach_shared::validation::validate_settings;
use peso_coach_shared::{
    run_projection, summarize, CoachState, DayLog, EngineError, ProjectionRun, Settings, TrendSummary,
};
use sqlx::PgPool;
use tracing::{debug, info};

pub struct CoachService;

impl CoachService {
    /// Stored settings, or the defaults for a user who never saved any
    pub async fn settings(pool: &PgPool, user: &str) -> Result<Settings, ApiError> {
        validate_user_key(user)?;
        let settings = SettingsRepository::get(pool, user)
            .await
            .map_err(ApiError::Internal)?;
        Ok(settings.unwrap_or_default())
    }

    pub async fn put_settings(pool: &PgPool, user: &str, settings: Settings) -> Result<Settings, ApiError> {
        validate_user_key(user)?;
        validate_settings(&settings).map_err(EngineError::InvalidParams)?;
        SettingsRepository::put(pool, user, &settings)
            .await
            .map_err(ApiError::Internal)?;
        info!(user = %user, "Settings updated");
        Ok(settings)
    }

    /// Logs and settings together
    pub async fn state(pool: &PgPool, user: &str) -> Result<CoachState, ApiError> {
        let settings = Self::settings(pool, user).await?;
        let logs = DayLogRepository::list(pool, user)
            .await
            .map_err(ApiError::Internal)?
            .into_iter()
            .map(DayLog::from)
            .collect();
        Ok(CoachState { logs, settings })
    }

    /// Week summary as of `date`, or as of the latest logged date
    pub async fn trend(pool: &PgPool, user: &str, date: Option<NaiveDate>) -> Result<TrendSummary, ApiError> {
        let state = Self::state(pool, user).await?;
        let date = date.unwrap_or_else(|| reference_date(&state.logs, Utc::now().date_naive()));
        let summary = summarize(&state.logs, &state.settings, date)?;
        debug!(user = %user, date = %date, mm_short = ?summary.mm_short, "Trend computed");
        Ok(summary)
    }

    pub async fn projection(pool: &PgPool, user: &str, today: Option<NaiveDate>) -> Result<ProjectionRun, ApiError> {
        let state = Self::state(pool, user).await?;
        let today = today.unwrap_or_else(|| Utc::now().date_naive());
        let run = run_projection(&state.logs, &state.settings, today)?;
        debug!(
            user = %user,
            start = %run.initial_date,
            weeks = run.weight.len(),
            with_body_fat = !run.body_fat.is_empty(),
            "Projection computed"
        );
        Ok(run)
    }
}
