use crate::error::{AppError, Result};
use crate::models::{PlannedVacation, VacationSummary};
use crate::routes::plans::bbox;
use crate::services::route_accumulator::{path_bounds, path_feature};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use geojson::Feature;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct VacationListResponse {
    pub vacations: Vec<VacationSummary>,
    pub count: usize,
    pub current_index: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct VacationDetailResponse {
    pub index: usize,
    pub summary: VacationSummary,
    pub vacation: PlannedVacation,
}

#[derive(Debug, Serialize)]
pub struct VacationPathResponse {
    pub index: usize,
    pub geometry: Feature,
    pub bounds: Option<[f64; 4]>,
}

/// GET /vacations - All planned vacations, earliest first
pub async fn list_vacations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<VacationListResponse>> {
    let list = state.vacations.load().await?;
    let current_index = state.vacations.current_index().await?;
    let vacations = list.summaries();
    Ok(Json(VacationListResponse {
        count: vacations.len(),
        vacations,
        current_index,
    }))
}

/// GET /vacations/{index} - Full vacation, which also becomes the current one
pub async fn get_vacation(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> Result<Json<VacationDetailResponse>> {
    let vacation = state.vacations.select(index).await?;

    Ok(Json(VacationDetailResponse {
        index,
        summary: vacation.summary(),
        vacation,
    }))
}

/// GET /vacations/current - The vacation last saved or opened
pub async fn current_vacation(
    State(state): State<Arc<AppState>>,
) -> Result<Json<VacationDetailResponse>> {
    let index = state
        .vacations
        .current_index()
        .await?
        .ok_or_else(|| AppError::NotFound("No vacation selected".to_string()))?;
    let list = state.vacations.load().await?;
    let vacation = list.get(index)?.clone();

    Ok(Json(VacationDetailResponse {
        index,
        summary: vacation.summary(),
        vacation,
    }))
}

/// GET /vacations/{index}/path - Road geometry of a saved vacation
pub async fn vacation_path(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> Result<Json<VacationPathResponse>> {
    let list = state.vacations.load().await?;
    let vacation = list.get(index)?;
    let path = state.accumulator.trace(&vacation.route).await?;

    tracing::debug!(
        index,
        points = path.len(),
        "Traced vacation '{}' with {} points",
        vacation.name, path.len()
    );

    Ok(Json(VacationPathResponse {
        index,
        geometry: path_feature(&path),
        bounds: bbox(path_bounds(&path)),
    }))
}

/// DELETE /vacations/{index}
pub async fn delete_vacation(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> Result<StatusCode> {
    state.vacations.remove(index).await?;
    Ok(StatusCode::NO_CONTENT)
}
