//! Day log service
//!
//! Write paths validate through the engine before touching the database.

use crate::error::ApiError;
use crate::repositories::DayLogRepository;
use peso_coach_shared::logs::{merge_logs, month_bounds, month_key, MonthPayload};
use peso_coach_shared::validation::validate_day_log;
use peso_coach_shared::{DayLog, EngineError, WriteSummary};
use sqlx::PgPool;
use tracing::info;

/// Longest accepted user key
pub const MAX_USER_KEY_LEN: usize = 64;

/// User keys appear in URLs and as storage keys: ASCII letters, digits, `-`, `_`
pub fn validate_user_key(user: &str) -> Result<(), ApiError> {
    let valid = !user.is_empty()
        && user.len() <= MAX_USER_KEY_LEN
        && user.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(ApiError::Validation(format!("Invalid user key: {:?}", user)));
    }
    Ok(())
}

/// Reject batches above the configured import limit
pub fn check_batch_size(count: usize, max: usize) -> Result<(), ApiError> {
    if count > max {
        return Err(ApiError::TooManyLogs { count, limit: max });
    }
    Ok(())
}

pub struct LogService;

impl LogService {
    pub async fn list(pool: &PgPool, user: &str) -> Result<Vec<DayLog>, ApiError> {
        validate_user_key(user)?;
        let records = DayLogRepository::list(pool, user)
            .await
            .map_err(ApiError::Internal)?;
        Ok(records.into_iter().map(DayLog::from).collect())
    }

    /// Insert or replace the log for its date
    pub async fn upsert(pool: &PgPool, user: &str, log: DayLog) -> Result<DayLog, ApiError> {
        validate_user_key(user)?;
        validate_day_log(&log).map_err(EngineError::InvalidLog)?;

        let record = DayLogRepository::upsert(pool, user, &log)
            .await
            .map_err(ApiError::Internal)?;
        info!(user = %user, date = %log.date, "Day log stored");
        Ok(DayLog::from(record))
    }

    pub async fn get_month(pool: &PgPool, user: &str, month: &str) -> Result<MonthPayload, ApiError> {
        validate_user_key(user)?;
        let (first, last) = month_bounds(month)?;
        let records = DayLogRepository::list_range(pool, user, first, last)
            .await
            .map_err(ApiError::Internal)?;
        Ok(MonthPayload::new(records.into_iter().map(DayLog::from).collect()))
    }

    /// Merge a month document into storage by date
    pub async fn put_month(
        pool: &PgPool,
        user: &str,
        month: &str,
        body: serde_json::Value,
        max_logs: usize,
    ) -> Result<WriteSummary, ApiError> {
        validate_user_key(user)?;
        let (first, last) = month_bounds(month)?;
        let payload = MonthPayload::normalize(body)
            .ok_or_else(|| ApiError::BadRequest("Expected a logs array or {\"logs\": [...]}".to_string()))?;
        check_batch_size(payload.logs.len(), max_logs)?;

        if let Some(stray) = payload.logs.iter().find(|l| month_key(l.date) != month) {
            return Err(ApiError::Validation(format!(
                "Log dated {} does not belong to month {}",
                stray.date, month
            )));
        }

        let received = payload.logs.len();
        let merged = merge_logs(Vec::new(), payload.logs)?;
        DayLogRepository::upsert_many(pool, user, &merged)
            .await
            .map_err(ApiError::Internal)?;

        let stored = DayLogRepository::list_range(pool, user, first, last)
            .await
            .map_err(ApiError::Internal)?
            .len();
        info!(user = %user, month = %month, received, stored, "Month merged");
        Ok(WriteSummary { received, stored })
    }
}
