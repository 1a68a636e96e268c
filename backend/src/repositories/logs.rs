//! Day log repository

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use peso_coach_shared::DayLog;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

/// Day log row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DayLogRecord {
    pub user_key: String,
    pub log_date: NaiveDate,
    pub morning_kg: Option<Decimal>,
    pub night_kg: Option<Decimal>,
    pub body_fat_pct: Option<Decimal>,
    pub updated_at: DateTime<Utc>,
}

impl From<DayLogRecord> for DayLog {
    fn from(record: DayLogRecord) -> Self {
        DayLog {
            date: record.log_date,
            morning_kg: record.morning_kg.and_then(|d| d.to_f64()),
            night_kg: record.night_kg.and_then(|d| d.to_f64()),
            body_fat_pct: record.body_fat_pct.and_then(|d| d.to_f64()),
        }
    }
}

fn to_decimal(value: Option<f64>) -> Result<Option<Decimal>> {
    value
        .map(|v| Decimal::try_from(v).with_context(|| format!("{} is not representable as NUMERIC", v)))
        .transpose()
}

pub struct DayLogRepository;

impl DayLogRepository {
    /// All logs of a user, oldest first
    pub async fn list(pool: &PgPool, user_key: &str) -> Result<Vec<DayLogRecord>> {
        let records = sqlx::query_as::<_, DayLogRecord>(
            r#"
            SELECT user_key, log_date, morning_kg, night_kg, body_fat_pct, updated_at
            FROM day_logs
            WHERE user_key = $1
            ORDER BY log_date
            "#,
        )
        .bind(user_key)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Logs dated within `[start, end]`, oldest first
    pub async fn list_range(
        pool: &PgPool,
        user_key: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DayLogRecord>> {
        let records = sqlx::query_as::<_, DayLogRecord>(
            r#"
            SELECT user_key, log_date, morning_kg, night_kg, body_fat_pct, updated_at
            FROM day_logs
            WHERE user_key = $1 AND log_date >= $2 AND log_date <= $3
            ORDER BY log_date
            "#,
        )
        .bind(user_key)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Insert or replace the log for its date
    pub async fn upsert(pool: &PgPool, user_key: &str, log: &DayLog) -> Result<DayLogRecord> {
        let mut tx = pool.begin().await?;
        let record = Self::upsert_in(&mut tx, user_key, log).await?;
        tx.commit().await?;
        Ok(record)
    }

    /// Upsert many logs atomically
    pub async fn upsert_many(pool: &PgPool, user_key: &str, logs: &[DayLog]) -> Result<()> {
        let mut tx = pool.begin().await?;
        for log in logs {
            Self::upsert_in(&mut tx, user_key, log).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Drop every log of a user and store `logs` instead.
    ///
    /// Nothing is visible to other connections until the caller commits.
    pub async fn replace_all_in(tx: &mut Transaction<'_, Postgres>, user_key: &str, logs: &[DayLog]) -> Result<()> {
        sqlx::query("DELETE FROM day_logs WHERE user_key = $1")
            .bind(user_key)
            .execute(&mut **tx)
            .await?;
        for log in logs {
            Self::upsert_in(tx, user_key, log).await?;
        }
        Ok(())
    }

    async fn upsert_in(
        tx: &mut Transaction<'_, Postgres>,
        user_key: &str,
        log: &DayLog,
    ) -> Result<DayLogRecord> {
        let record = sqlx::query_as::<_, DayLogRecord>(
            r#"
            INSERT INTO day_logs (user_key, log_date, morning_kg, night_kg, body_fat_pct, updated_at)
            VALUES ($1, $2, $3, $4, $5, NOW())
            ON CONFLICT (user_key, log_date) DO UPDATE
            SET morning_kg = EXCLUDED.morning_kg,
                night_kg = EXCLUDED.night_kg,
                body_fat_pct = EXCLUDED.body_fat_pct,
                updated_at = NOW()
            RETURNING user_key, log_date, morning_kg, night_kg, body_fat_pct, updated_at
            "#,
        )
        .bind(user_key)
        .bind(log.date)
        .bind(to_decimal(log.morning_kg)?)
        .bind(to_decimal(log.night_kg)?)
        .bind(to_decimal(log.body_fat_pct)?)
        .fetch_one(&mut **tx)
        .await?;

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_record_to_day_log() {
        let record = DayLogRecord {
            user_key: "ana".to_string(),
            log_date: NaiveDate::from_ymd_opt(2025, 9, 5).unwrap(),
            morning_kg: None,
            night_kg: Some(Decimal::from_str("81.80").unwrap()),
            body_fat_pct: Some(Decimal::from_str("22.40").unwrap()),
            updated_at: Utc::now(),
        };
        let log = DayLog::from(record);
        assert_eq!(log.morning_kg, None);
        assert_eq!(log.night_kg, Some(81.8));
        assert_eq!(log.body_fat_pct, Some(22.4));
    }

    #[test]
    fn test_to_decimal() {
        assert_eq!(to_decimal(None).unwrap(), None);
        assert_eq!(to_decimal(Some(81.5)).unwrap(), Some(Decimal::from_str("81.5").unwrap()));
        assert!(to_decimal(Some(f64::NAN)).is_err());
    }
}
