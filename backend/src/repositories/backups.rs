//! Backup snapshot repository

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Stored backup row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BackupRecord {
    pub id: Uuid,
    pub backup_key: String,
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

pub struct BackupRepository;

impl BackupRepository {
    pub async fn create(pool: &PgPool, backup_key: &str, payload: &serde_json::Value) -> Result<BackupRecord> {
        let record = sqlx::query_as::<_, BackupRecord>(
            r#"
            INSERT INTO backups (id, backup_key, payload)
            VALUES ($1, $2, $3)
            RETURNING id, backup_key, payload, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(backup_key)
        .bind(payload)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Most recent backup under `backup_key`
    pub async fn latest(pool: &PgPool, backup_key: &str) -> Result<Option<BackupRecord>> {
        let record = sqlx::query_as::<_, BackupRecord>(
            r#"
            SELECT id, backup_key, payload, created_at
            FROM backups
            WHERE backup_key = $1
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(backup_key)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }
}
