use crate::error::{AppError, Result};
use crate::models::{Coordinates, PoiCategory, PointOfInterest};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const MAPBOX_GEOCODING_BASE_URL: &str = "https://api.mapbox.com/geocoding/v5";

/// Place lookups used while building a plan.
#[async_trait]
pub trait PlaceSearch: Send + Sync {
    async fn search_nearby(
        &self,
        center: Coordinates,
        category: PoiCategory,
        limit: u32,
    ) -> Result<Vec<PointOfInterest>>;

    async fn search_address(&self, query: &str, limit: u32) -> Result<Vec<PointOfInterest>>;

    async fn reverse(&self, coordinates: Coordinates) -> Result<PointOfInterest>;
}

/// Place search and reverse geocoding against the Mapbox Geocoding API.
#[derive(Clone)]
pub struct MapboxGeocoder {
    client: Client,
    api_key: String,
    base_url: String,
}

impl MapboxGeocoder {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, MAPBOX_GEOCODING_BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        MapboxGeocoder {
            client: Client::new(),
            api_key,
            base_url,
        }
    }

    /// Places of one category near `center`, closest-ranked first.
    /// Every result carries the searched category.
    pub async fn search_nearby(
        &self,
        center: Coordinates,
        category: PoiCategory,
        limit: u32,
    ) -> Result<Vec<PointOfInterest>> {
        let proximity = format!("{},{}", center.lng, center.lat);
        let limit = limit.to_string();
        let features = self
            .fetch(
                category.search_term(),
                &[
                    ("proximity", proximity.as_str()),
                    ("types", "poi"),
                    ("limit", limit.as_str()),
                ],
            )
            .await?;

        let pois: Vec<PointOfInterest> = features
            .into_iter()
            .filter_map(|f| f.into_poi(Some(category)))
            .collect();

        tracing::debug!(
            category = %category,
            lat = center.lat,
            lng = center.lng,
            count = pois.len(),
            "Found {} {} places near ({:.4}, {:.4})",
            pois.len(), category, center.lat, center.lng
        );
        Ok(pois)
    }

    /// Free-text lookup for a starting location
    pub async fn search_address(&self, query: &str, limit: u32) -> Result<Vec<PointOfInterest>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidArgument(
                "Search text must not be empty".to_string(),
            ));
        }

        let limit = limit.to_string();
        let features = self.fetch(query, &[("limit", limit.as_str())]).await?;
        Ok(features
            .into_iter()
            .filter_map(|f| f.into_poi(None))
            .collect())
    }

    /// Address of the place at `coordinates`, as a starting location
    pub async fn reverse(&self, coordinates: Coordinates) -> Result<PointOfInterest> {
        let query = format!("{},{}", coordinates.lng, coordinates.lat);
        let feature = self
            .fetch(&query, &[("limit", "1")])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "No address found at ({}, {})",
                    coordinates.lat, coordinates.lng
                ))
            })?;

        // Keep the queried point rather than the feature center: the user
        // clicked exactly here.
        PointOfInterest::location(coordinates.lat, coordinates.lng, feature.place_name)
    }

    async fn fetch(&self, query: &str, params: &[(&str, &str)]) -> Result<Vec<MapboxFeature>> {
        let url = format!(
            "{}/mapbox.places/{}.json",
            self.base_url,
            urlencoding::encode(query)
        );

        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("access_token", &self.api_key)])
            .send()
            .await
            .map_err(|e| AppError::Geocoding(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(status = %status, "Mapbox geocoding HTTP error {}: {}", status, error_text);
            return Err(AppError::Geocoding(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body: MapboxGeocodingResponse = response
            .json()
            .await
            .map_err(|e| AppError::Geocoding(format!("Failed to parse response: {}", e)))?;
        Ok(body.features)
    }
}

#[async_trait]
impl PlaceSearch for MapboxGeocoder {
    async fn search_nearby(
        &self,
        center: Coordinates,
        category: PoiCategory,
        limit: u32,
    ) -> Result<Vec<PointOfInterest>> {
        MapboxGeocoder::search_nearby(self, center, category, limit).await
    }

    async fn search_address(&self, query: &str, limit: u32) -> Result<Vec<PointOfInterest>> {
        MapboxGeocoder::search_address(self, query, limit).await
    }

    async fn reverse(&self, coordinates: Coordinates) -> Result<PointOfInterest> {
        MapboxGeocoder::reverse(self, coordinates).await
    }
}

#[derive(Debug, Deserialize)]
struct MapboxGeocodingResponse {
    #[serde(default)]
    features: Vec<MapboxFeature>,
}

#[derive(Debug, Deserialize)]
struct MapboxFeature {
    text: String,
    place_name: String,
    center: [f64; 2], // [lng, lat]
}

impl MapboxFeature {
    fn into_poi(self, category: Option<PoiCategory>) -> Option<PointOfInterest> {
        let [lng, lat] = self.center;
        match PointOfInterest::new(lat, lng, self.place_name, Some(self.text), category) {
            Ok(poi) => Some(poi),
            Err(e) => {
                tracing::warn!("Skipping unusable geocoding result: {}", e);
                None
            }
        }
    }
}
