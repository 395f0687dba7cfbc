use crate::constants::MAX_POI_SEARCH_LIMIT;
use crate::error::{AppError, Result};
use crate::models::{Coordinates, PoiCategory, PointOfInterest};
use crate::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Query parameters for POI search
#[derive(Debug, Deserialize)]
pub struct PoiQueryParams {
    /// Latitude of the map center
    pub lat: f64,
    /// Longitude of the map center
    pub lng: f64,
    /// One of tourism, hotel, gas_station, food
    pub category: String,
    /// Maximum number of results (defaults to the configured limit)
    #[serde(default)]
    pub limit: Option<u32>,
}

impl PoiQueryParams {
    pub fn validate(&self) -> Result<()> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(AppError::InvalidArgument(
                "lat must be between -90 and 90".to_string(),
            ));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(AppError::InvalidArgument(
                "lng must be between -180 and 180".to_string(),
            ));
        }
        if let Some(limit) = self.limit {
            if limit == 0 || limit > MAX_POI_SEARCH_LIMIT {
                return Err(AppError::InvalidArgument(format!(
                    "limit must be between 1 and {}",
                    MAX_POI_SEARCH_LIMIT
                )));
            }
        }
        Ok(())
    }

    pub fn parse_category(&self) -> Result<PoiCategory> {
        self.category
            .parse::<PoiCategory>()
            .map_err(AppError::InvalidArgument)
    }
}

/// Response for POI queries
#[derive(Debug, Serialize)]
pub struct PoiResponse {
    pub pois: Vec<PointOfInterest>,
    pub count: usize,
    pub query: PoiQueryInfo,
}

#[derive(Debug, Serialize)]
pub struct PoiQueryInfo {
    pub center: Coordinates,
    pub category: PoiCategory,
    pub limit: u32,
}

/// GET /pois - Places of one category around the map center
pub async fn query_pois(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PoiQueryParams>,
) -> Result<Json<PoiResponse>> {
    params.validate()?;
    let category = params.parse_category()?;
    let limit = params.limit.unwrap_or(state.poi_search_limit);

    let center =
        Coordinates::new(params.lat, params.lng).map_err(AppError::InvalidArgument)?;

    tracing::info!(
        lat = center.lat,
        lng = center.lng,
        category = %category,
        limit,
        "POI query: {} near ({:.4}, {:.4}), limit={}",
        category, center.lat, center.lng, limit
    );

    let pois = state.places.search_nearby(center, category, limit).await?;
    let count = pois.len();

    tracing::info!("POI query returned {} results", count);

    Ok(Json(PoiResponse {
        pois,
        count,
        query: PoiQueryInfo {
            center,
            category,
            limit,
        },
    }))
}
