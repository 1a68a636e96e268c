//! Day log and month routes

use crate::error::ApiError;
use crate::services::LogService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use peso_coach_shared::logs::MonthPayload;
use peso_coach_shared::{DayLog, LogDayRequest, WriteSummary};
use validator::Validate;

pub fn log_routes() -> Router<AppState> {
    Router::new()
        .route("/logs", get(list_logs).post(upsert_log))
        .route("/months/:month", get(get_month).put(put_month))
}

/// GET /api/v1/users/:user/logs
async fn list_logs(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Result<Json<Vec<DayLog>>, ApiError> {
    let logs = LogService::list(state.db(), &user).await?;
    Ok(Json(logs))
}

/// POST /api/v1/users/:user/logs - insert or replace the log for a date
async fn upsert_log(
    State(state): State<AppState>,
    Path(user): Path<String>,
    Json(req): Json<LogDayRequest>,
) -> Result<Json<DayLog>, ApiError> {
    req.validate()?;
    let log = LogService::upsert(state.db(), &user, req.into()).await?;
    Ok(Json(log))
}

/// GET /api/v1/users/:user/months/:month
async fn get_month(
    State(state): State<AppState>,
    Path((user, month)): Path<(String, String)>,
) -> Result<Json<MonthPayload>, ApiError> {
    let payload = LogService::get_month(state.db(), &user, &month).await?;
    Ok(Json(payload))
}

/// PUT /api/v1/users/:user/months/:month - merge by date; bare arrays accepted
async fn put_month(
    State(state): State<AppState>,
    Path((user, month)): Path<(String, String)>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<WriteSummary>, ApiError> {
    let max = state.config().sync.max_import_logs;
    let summary = LogService::put_month(state.db(), &user, &month, body, max).await?;
    Ok(Json(summary))
}
