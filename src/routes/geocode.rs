use crate::constants::MAX_POI_SEARCH_LIMIT;
use crate::error::{AppError, Result};
use crate::models::{Coordinates, PointOfInterest};
use crate::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default)]
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ReverseParams {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<PointOfInterest>,
    pub count: usize,
}

/// GET /geocode/search?q= - Candidate starting locations for free text
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>> {
    let limit = params
        .limit
        .unwrap_or(state.poi_search_limit)
        .clamp(1, MAX_POI_SEARCH_LIMIT);

    tracing::info!(query = %params.q, limit, "Address search: '{}'", params.q);

    let results = state.places.search_address(&params.q, limit).await?;
    let count = results.len();
    Ok(Json(SearchResponse { results, count }))
}

/// GET /geocode/reverse?lat=&lng= - Address of a clicked point or the user's position
pub async fn reverse(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReverseParams>,
) -> Result<Json<PointOfInterest>> {
    let at = Coordinates::new(params.lat, params.lng).map_err(AppError::InvalidArgument)?;
    let location = state.places.reverse(at).await?;

    tracing::debug!(
        lat = at.lat,
        lng = at.lng,
        "Reverse geocoded ({:.4}, {:.4}) to '{}'",
        at.lat, at.lng, location.address()
    );
    Ok(Json(location))
}
