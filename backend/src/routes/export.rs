//! Export and import routes

use crate::error::ApiError;
use crate::services::ExportService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use peso_coach_shared::{CoachState, WriteSummary};

pub fn export_routes() -> Router<AppState> {
    Router::new()
        .route("/export", get(export_json))
        .route("/export/csv", get(export_csv))
        .route("/import", post(import_json))
}

fn attachment_headers(content_type: &'static str, filename: &str) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename))
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("Invalid header value: {}", e)))?;
    headers.insert(header::CONTENT_DISPOSITION, disposition);
    Ok(headers)
}

/// GET /api/v1/users/:user/export - full state as JSON
async fn export_json(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let export = ExportService::export_json(state.db(), &user).await?;

    let json = serde_json::to_string_pretty(&export)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("JSON serialization error: {}", e)))?;
    let headers = attachment_headers("application/json", &format!("peso-coach-{}.json", user))?;

    Ok((headers, json))
}

/// GET /api/v1/users/:user/export/csv - day logs as CSV
async fn export_csv(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let csv = ExportService::export_csv(state.db(), &user).await?;
    let headers = attachment_headers("text/csv", &format!("peso-coach-{}.csv", user))?;

    Ok((headers, csv))
}

/// POST /api/v1/users/:user/import - replaces logs and settings
async fn import_json(
    State(state): State<AppState>,
    Path(user): Path<String>,
    Json(import): Json<CoachState>,
) -> Result<Json<WriteSummary>, ApiError> {
    let max = state.config().sync.max_import_logs;
    let summary = ExportService::import_json(state.db(), &user, import, max).await?;
    Ok(Json(summary))
}
