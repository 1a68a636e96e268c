//! Remote backup and restore of a full coach state

use crate::error::ApiError;
use crate::repositories::BackupRepository;
use crate::services::logs::check_batch_size;
use chrono::{DateTime, Utc};
use peso_coach_shared::validation::validate_settings;
use peso_coach_shared::{merge_logs, CoachState, EngineError};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

/// Backups written without an explicit key land here
pub const DEFAULT_BACKUP_KEY: &str = "default";

/// Acknowledgement of a stored backup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupReceipt {
    pub ok: bool,
    pub id: Uuid,
    pub backup_key: String,
    pub created_at: DateTime<Utc>,
    pub logs: usize,
}

pub struct BackupService;

impl BackupService {
    /// Store a snapshot once its logs and settings pass the same checks as an import
    pub async fn backup(
        pool: &PgPool,
        backup_key: &str,
        state: CoachState,
        max_logs: usize,
    ) -> Result<BackupReceipt, ApiError> {
        check_batch_size(state.logs.len(), max_logs)?;
        validate_settings(&state.settings).map_err(EngineError::InvalidParams)?;
        let state = CoachState {
            logs: merge_logs(Vec::new(), state.logs)?,
            settings: state.settings,
        };
        let payload = serde_json::to_value(&state).map_err(|e| ApiError::Internal(e.into()))?;

        let record = BackupRepository::create(pool, backup_key, &payload)
            .await
            .map_err(ApiError::Internal)?;
        info!(backup_key = %backup_key, id = %record.id, logs = state.logs.len(), "Backup stored");

        Ok(BackupReceipt {
            ok: true,
            id: record.id,
            backup_key: record.backup_key,
            created_at: record.created_at,
            logs: state.logs.len(),
        })
    }

    /// Latest backup under `backup_key`
    pub async fn restore(pool: &PgPool, backup_key: &str) -> Result<CoachState, ApiError> {
        let record = BackupRepository::latest(pool, backup_key)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound(format!("No backup stored under {:?}", backup_key)))?;

        serde_json::from_value(record.payload).map_err(|e| {
            error!(id = %record.id, "Stored backup is not a valid state: {}", e);
            ApiError::Internal(e.into())
        })
    }
}
