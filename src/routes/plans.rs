use crate::error::{AppError, Result};
use crate::models::vehicle::{catalogue, find_vehicle};
use crate::models::{PlannedVacation, PointOfInterest, Route, VacationSummary, Vehicle};
use crate::services::route_accumulator::AccumulationReport;
use crate::{AppState, DraftPlan};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use geo::Rect;
use geojson::Feature;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::Date;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct VehiclesResponse {
    pub vehicles: Vec<Vehicle>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePlanRequest {
    pub starting_point: PointOfInterest,
    /// Name of a catalogue vehicle
    pub vehicle: String,
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    /// Current stopover indices in the new visiting order. Indices left out
    /// are dropped from the plan.
    pub order: Vec<usize>,
}

#[derive(Debug, Deserialize)]
pub struct SavePlanRequest {
    pub name: String,
    /// ISO date, e.g. "2025-01-04"
    pub starting_date: Date,
}

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub id: Uuid,
    pub ready_to_save: bool,
    pub route: Route,
}

/// A plan after its stopovers changed and the route was accumulated again.
#[derive(Debug, Serialize)]
pub struct PlanUpdateResponse {
    pub id: Uuid,
    pub ready_to_save: bool,
    pub route: Route,
    pub remaining_range_km: f64,
    pub rejected: Vec<RejectedNotice>,
    pub geometry: Feature,
    /// [min_lng, min_lat, max_lng, max_lat]
    pub bounds: Option<[f64; 4]>,
}

#[derive(Debug, Serialize)]
pub struct RejectedNotice {
    pub original_index: usize,
    pub label: String,
    pub leg_distance_km: f64,
    pub remaining_range_km: f64,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SavedPlanResponse {
    pub index: usize,
    pub vacation: VacationSummary,
}

pub(crate) fn bbox(rect: Option<Rect<f64>>) -> Option<[f64; 4]> {
    rect.map(|r| [r.min().x, r.min().y, r.max().x, r.max().y])
}

impl PlanUpdateResponse {
    fn new(id: Uuid, route: Route, report: AccumulationReport) -> Self {
        let geometry = report.path_feature();
        let bounds = bbox(report.bounds());
        PlanUpdateResponse {
            id,
            ready_to_save: route.is_ready_to_save(),
            route,
            remaining_range_km: report.remaining_range_km,
            rejected: report
                .rejected
                .iter()
                .map(|r| RejectedNotice {
                    original_index: r.original_index,
                    label: r.name.clone().unwrap_or_else(|| r.address.clone()),
                    leg_distance_km: r.leg_distance_km,
                    remaining_range_km: r.remaining_range_km,
                    message: r.message(),
                })
                .collect(),
            geometry,
            bounds,
        }
    }
}

async fn find_draft(state: &AppState, id: Uuid) -> Result<DraftPlan> {
    state
        .drafts
        .get(&id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("No draft plan with id {}", id)))
}

/// A plan saved or cancelled while we waited for its lock is gone.
fn ensure_still_open(state: &AppState, id: Uuid) -> Result<()> {
    if state.drafts.contains_key(&id) {
        Ok(())
    } else {
        Err(AppError::NotFound(format!("No draft plan with id {}", id)))
    }
}

/// Apply `edit` to a copy of the draft route, accumulate it, and keep the
/// result only if every leg could be routed.
async fn edit_and_accumulate<F>(state: &AppState, id: Uuid, edit: F) -> Result<PlanUpdateResponse>
where
    F: FnOnce(&mut Route) -> Result<()>,
{
    let draft = find_draft(state, id).await?;
    let mut route = draft.lock().await;
    ensure_still_open(state, id)?;

    let mut candidate = route.clone();
    edit(&mut candidate)?;
    let report = state.accumulator.accumulate(&mut candidate).await?;
    *route = candidate;

    Ok(PlanUpdateResponse::new(id, route.clone(), report))
}

/// GET /vehicles - Vehicle profiles a plan can start with
pub async fn list_vehicles() -> Json<VehiclesResponse> {
    Json(VehiclesResponse {
        vehicles: catalogue(),
    })
}

/// POST /plans - Start a draft plan from a starting point and a vehicle
pub async fn create_plan(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreatePlanRequest>,
) -> Result<(StatusCode, Json<PlanResponse>)> {
    let vehicle = find_vehicle(&request.vehicle).ok_or_else(|| {
        AppError::InvalidArgument(format!("Unknown vehicle '{}'", request.vehicle))
    })?;

    let id = Uuid::new_v4();
    let route = Route::new(request.starting_point, vehicle);

    tracing::info!(
        plan = %id,
        vehicle = route.vehicle_name(),
        range_km = route.vehicle_range(),
        "Draft plan {} started at '{}' with {}",
        id, route.starting_point().address(), route.vehicle_name()
    );

    state
        .drafts
        .insert(id, Arc::new(tokio::sync::Mutex::new(route.clone())))
        .await;

    Ok((
        StatusCode::CREATED,
        Json(PlanResponse {
            id,
            ready_to_save: false,
            route,
        }),
    ))
}

/// GET /plans/{id}
pub async fn get_plan(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<PlanResponse>> {
    let draft = find_draft(&state, id).await?;
    let route = draft.lock().await.clone();
    ensure_still_open(&state, id)?;
    Ok(Json(PlanResponse {
        id,
        ready_to_save: route.is_ready_to_save(),
        route,
    }))
}

/// DELETE /plans/{id} - Discard a plan without saving it
pub async fn cancel_plan(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    let draft = find_draft(&state, id).await?;
    let _guard = draft.lock().await;
    ensure_still_open(&state, id)?;
    state.drafts.invalidate(&id).await;
    tracing::info!(plan = %id, "Draft plan {} cancelled", id);
    Ok(StatusCode::NO_CONTENT)
}

/// POST /plans/{id}/stopovers - Append a stopover and re-accumulate
pub async fn add_stopover(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(poi): Json<PointOfInterest>,
) -> Result<Json<PlanUpdateResponse>> {
    tracing::info!(plan = %id, stopover = poi.label(), "Adding stopover '{}'", poi.label());
    let response = edit_and_accumulate(&state, id, |route| {
        route.add_stopover(poi);
        Ok(())
    })
    .await?;
    Ok(Json(response))
}

/// PUT /plans/{id}/stopovers - Reorder stopovers and re-accumulate
pub async fn reorder_stopovers(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<ReorderRequest>,
) -> Result<Json<PlanUpdateResponse>> {
    tracing::info!(plan = %id, order = ?request.order, "Reordering stopovers");
    let response =
        edit_and_accumulate(&state, id, |route| route.reorder_stopovers(&request.order)).await?;
    Ok(Json(response))
}

/// DELETE /plans/{id}/stopovers/{index} - Remove one stopover and re-accumulate
pub async fn remove_stopover(
    State(state): State<Arc<AppState>>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> Result<Json<PlanUpdateResponse>> {
    let response = edit_and_accumulate(&state, id, |route| {
        let removed = route.remove_stopover_at(index)?;
        tracing::info!(plan = %id, index, "Removed stopover '{}'", removed.label());
        Ok(())
    })
    .await?;
    Ok(Json(response))
}

/// POST /plans/{id}/save - Turn the draft into a planned vacation
pub async fn save_plan(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<SavePlanRequest>,
) -> Result<(StatusCode, Json<SavedPlanResponse>)> {
    // Held until the draft is gone, so no edit can land after the snapshot
    let draft = find_draft(&state, id).await?;
    let guard = draft.lock().await;
    ensure_still_open(&state, id)?;
    let route = guard.clone();

    if !route.is_ready_to_save() {
        return Err(AppError::InvalidArgument(format!(
            "A vacation needs at least {} stopovers, this plan has {}",
            crate::constants::MIN_STOPOVERS_TO_SAVE,
            route.num_stops()
        )));
    }

    let vacation = PlannedVacation::new(request.name, request.starting_date, route)?;
    let summary = vacation.summary();
    let index = state.vacations.add(vacation).await?;
    state.drafts.invalidate(&id).await;
    drop(guard);

    tracing::info!(
        plan = %id,
        index,
        name = %summary.name,
        "Draft plan {} saved as vacation '{}'",
        id, summary.name
    );

    Ok((
        StatusCode::CREATED,
        Json(SavedPlanResponse {
            index,
            vacation: summary,
        }),
    ))
}
