//! Backup and restore routes (bearer token required)

use crate::auth::BackupAuth;
use crate::error::ApiError;
use crate::services::backup::{BackupReceipt, BackupService, DEFAULT_BACKUP_KEY};
use crate::services::logs::validate_user_key;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use peso_coach_shared::CoachState;
use serde::Deserialize;

pub fn backup_routes() -> Router<AppState> {
    Router::new()
        .route("/backup", post(backup))
        .route("/restore", get(restore))
}

#[derive(Debug, Default, Deserialize)]
struct BackupQuery {
    key: Option<String>,
}

impl BackupQuery {
    fn backup_key(&self) -> Result<&str, ApiError> {
        let key = self.key.as_deref().unwrap_or(DEFAULT_BACKUP_KEY);
        validate_user_key(key)?;
        Ok(key)
    }
}

/// POST /api/v1/backup
async fn backup(
    _auth: BackupAuth,
    State(state): State<AppState>,
    Query(query): Query<BackupQuery>,
    Json(coach_state): Json<CoachState>,
) -> Result<Json<BackupReceipt>, ApiError> {
    let max = state.config().sync.max_import_logs;
    let receipt = BackupService::backup(state.db(), query.backup_key()?, coach_state, max).await?;
    Ok(Json(receipt))
}

/// GET /api/v1/restore - latest backup, 404 when none exists
async fn restore(
    _auth: BackupAuth,
    State(state): State<AppState>,
    Query(query): Query<BackupQuery>,
) -> Result<Json<CoachState>, ApiError> {
    let restored = BackupService::restore(state.db(), query.backup_key()?).await?;
    Ok(Json(restored))
}
