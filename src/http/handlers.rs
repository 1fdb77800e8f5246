use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::error::AppError;
use super::state::AppState;
use crate::engine::EngineError;
use crate::model::{AvailabilityResponse, FreeWindows, ResourceInfo};
use crate::validate::{RawAvailabilityRequest, ValidationError};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub resources: usize,
}

#[derive(Debug, Deserialize)]
pub struct FreeWindowsQuery {
    pub date: Option<String>,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        resources: state.engine.registry().len(),
    })
}

/// POST /v1/availability
///
/// Is the court free for the requested window? Conflicts come back as a
/// normal 200 answer with `isAvailable: false`.
pub async fn check_availability(
    State(state): State<AppState>,
    payload: Result<Json<RawAvailabilityRequest>, JsonRejection>,
) -> HandlerResult<AvailabilityResponse> {
    let Json(raw) = payload?;
    let response = state.engine.check(&raw).map_err(|e| {
        tracing::debug!("availability check rejected: {e}");
        e
    })?;
    Ok(Json(response))
}

/// GET /v1/resources
pub async fn list_resources(State(state): State<AppState>) -> Json<Vec<ResourceInfo>> {
    Json(state.engine.list_resources())
}

/// GET /v1/resources/{id}/free?date=YYYY-MM-DD
pub async fn free_windows(
    State(state): State<AppState>,
    Path(resource_id): Path<String>,
    query: Result<Query<FreeWindowsQuery>, QueryRejection>,
) -> HandlerResult<FreeWindows> {
    let Query(query) = query?;
    let Some(date) = query.date else {
        return Err(EngineError::from(ValidationError::missing("date")).into());
    };
    Ok(Json(state.engine.free_windows(&resource_id, &date)?))
}
