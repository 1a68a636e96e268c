//! Settings, trend and projection routes

use crate::error::ApiError;
use crate::services::CoachService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use peso_coach_shared::{ProjectionQuery, ProjectionRun, Settings, TrendQuery, TrendSummary};

pub fn coach_routes() -> Router<AppState> {
    Router::new()
        .route("/settings", get(get_settings).put(put_settings))
        .route("/trend", get(get_trend))
        .route("/projection", get(get_projection))
}

async fn get_settings(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Result<Json<Settings>, ApiError> {
    Ok(Json(CoachService::settings(state.db(), &user).await?))
}

/// PUT /api/v1/users/:user/settings - rejects malformed projection params
async fn put_settings(
    State(state): State<AppState>,
    Path(user): Path<String>,
    Json(settings): Json<Settings>,
) -> Result<Json<Settings>, ApiError> {
    Ok(Json(CoachService::put_settings(state.db(), &user, settings).await?))
}

/// GET /api/v1/users/:user/trend?date=YYYY-MM-DD
async fn get_trend(
    State(state): State<AppState>,
    Path(user): Path<String>,
    Query(query): Query<TrendQuery>,
) -> Result<Json<TrendSummary>, ApiError> {
    Ok(Json(CoachService::trend(state.db(), &user, query.date).await?))
}

/// GET /api/v1/users/:user/projection?today=YYYY-MM-DD
async fn get_projection(
    State(state): State<AppState>,
    Path(user): Path<String>,
    Query(query): Query<ProjectionQuery>,
) -> Result<Json<ProjectionRun>, ApiError> {
    Ok(Json(CoachService::projection(state.db(), &user, query.today).await?))
}
