use crate::error::{AppError, Result};
use crate::models::Coordinates;
use crate::services::directions::{DirectionsProvider, Leg};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

const MAPBOX_DIRECTIONS_BASE_URL: &str = "https://api.mapbox.com/directions/v5/mapbox";
const DRIVING_PROFILE: &str = "driving";

/// How the client authenticates with the directions API.
#[derive(Clone, Debug)]
pub enum AuthMode {
    /// Current default: send `access_token` query param (direct Mapbox).
    DirectToken,
    /// Proxy mode: send `Authorization: Bearer` header.
    BearerHeader,
}

#[derive(Clone)]
pub struct MapboxClient {
    client: Client,
    api_key: String,
    base_url: String,
    auth_mode: AuthMode,
}

impl MapboxClient {
    pub fn new(api_key: String) -> Self {
        MapboxClient {
            client: Client::new(),
            api_key,
            base_url: MAPBOX_DIRECTIONS_BASE_URL.to_string(),
            auth_mode: AuthMode::DirectToken,
        }
    }

    pub fn with_config(api_key: String, base_url: String, auth_mode: AuthMode) -> Self {
        MapboxClient {
            client: Client::new(),
            api_key,
            base_url,
            auth_mode,
        }
    }

    /// Driving directions for one leg, with full road geometry
    pub async fn get_directions(
        &self,
        from: Coordinates,
        to: Coordinates,
    ) -> Result<DirectionsResponse> {
        // "lng,lat;lng,lat"
        let coordinates_str = format!("{},{};{},{}", from.lng, from.lat, to.lng, to.lat);

        let url = format!("{}/{}/{}", self.base_url, DRIVING_PROFILE, coordinates_str);

        tracing::debug!(
            from_lat = from.lat,
            from_lng = from.lng,
            to_lat = to.lat,
            to_lng = to.lng,
            "Mapbox API request: ({:.4}, {:.4}) -> ({:.4}, {:.4}), profile {}",
            from.lat, from.lng, to.lat, to.lng, DRIVING_PROFILE
        );

        let mut request = self.client.get(&url).query(&[
            ("geometries", "geojson"),
            ("overview", "full"),
            ("steps", "false"),
        ]);

        match self.auth_mode {
            AuthMode::DirectToken => {
                request = request.query(&[("access_token", &self.api_key)]);
            }
            AuthMode::BearerHeader => {
                request = request.bearer_auth(&self.api_key);
            }
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::ProviderUnavailable(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(
                status = %status,
                "Mapbox API HTTP error {}: {}",
                status, error_text
            );
            return Err(classify_http_error(
                status,
                format!("HTTP {}: {}", status, error_text),
            ));
        }

        let directions: MapboxDirectionsApiResponse = response.json().await.map_err(|e| {
            AppError::ProviderUnavailable(format!("Failed to parse response: {}", e))
        })?;

        directions.into_first_route()
    }
}

#[async_trait]
impl DirectionsProvider for MapboxClient {
    async fn get_leg(&self, from: Coordinates, to: Coordinates) -> Result<Leg> {
        let directions = self.get_directions(from, to).await?;
        Leg::new(directions.distance_km(), directions.to_coordinates())
    }
}

/// Rate limits, auth problems and server errors are worth retrying later;
/// any other client error means the request itself has no route.
fn classify_http_error(status: StatusCode, message: String) -> AppError {
    if status.is_server_error()
        || status == StatusCode::UNAUTHORIZED
        || status == StatusCode::FORBIDDEN
        || status == StatusCode::TOO_MANY_REQUESTS
    {
        AppError::ProviderUnavailable(message)
    } else {
        AppError::NoRouteFound(message)
    }
}

// Mapbox API response types

#[derive(Debug, Deserialize)]
struct MapboxDirectionsApiResponse {
    #[serde(default)]
    routes: Vec<MapboxRoute>,
    code: String,
}

impl MapboxDirectionsApiResponse {
    fn into_first_route(self) -> Result<DirectionsResponse> {
        let Some(route) = self.routes.into_iter().next() else {
            tracing::warn!(code = %self.code, "Mapbox returned 0 routes ({})", self.code);
            return Err(AppError::NoRouteFound(format!(
                "No routes found (code {})",
                self.code
            )));
        };

        tracing::debug!(
            distance_km = %format!("{:.2}", route.distance / 1000.0),
            path_points = route.geometry.coordinates.len(),
            "Mapbox response: {:.2}km, {} path points",
            route.distance / 1000.0, route.geometry.coordinates.len()
        );
        Ok(DirectionsResponse {
            distance_meters: route.distance,
            geometry: route.geometry.coordinates,
        })
    }
}

#[derive(Debug, Deserialize)]
struct MapboxRoute {
    distance: f64, // meters
    geometry: MapboxGeometry,
}

#[derive(Debug, Deserialize)]
struct MapboxGeometry {
    coordinates: Vec<[f64; 2]>, // [lng, lat] pairs
}

// Our simplified response type

#[derive(Debug, Clone, Serialize)]
pub struct DirectionsResponse {
    pub distance_meters: f64,
    /// GeoJSON coordinates as [lng, lat] pairs
    pub geometry: Vec<[f64; 2]>,
}

impl DirectionsResponse {
    pub fn distance_km(&self) -> f64 {
        self.distance_meters / 1000.0
    }

    /// Convert GeoJSON coordinates to our Coordinates type
    pub fn to_coordinates(&self) -> Vec<Coordinates> {
        self.geometry
            .iter()
            .filter_map(|coord| Coordinates::from_lng_lat(*coord).ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults_to_direct_token() {
        let client = MapboxClient::new("pk.test123".to_string());
        assert_eq!(client.base_url, MAPBOX_DIRECTIONS_BASE_URL);
        assert!(matches!(client.auth_mode, AuthMode::DirectToken));
    }

    #[test]
    fn test_with_config_bearer_mode() {
        let client = MapboxClient::with_config(
            "my-key".to_string(),
            "http://localhost:4000/v1/directions".to_string(),
            AuthMode::BearerHeader,
        );
        assert_eq!(client.base_url, "http://localhost:4000/v1/directions");
        assert!(matches!(client.auth_mode, AuthMode::BearerHeader));
    }

    #[test]
    fn test_directions_response_conversions() {
        let response = DirectionsResponse {
            distance_meters: 62_400.0,
            geometry: vec![[144.9631, -37.8136], [144.3617, -38.1499]],
        };

        assert_eq!(response.distance_km(), 62.4);

        let coords = response.to_coordinates();
        assert_eq!(coords.len(), 2);
        assert_eq!(coords[0].lat, -37.8136);
        assert_eq!(coords[0].lng, 144.9631);
    }

    #[test]
    fn test_empty_routes_is_no_route() {
        let body = r#"{"code": "NoRoute", "routes": []}"#;
        let parsed: MapboxDirectionsApiResponse = serde_json::from_str(body).unwrap();
        assert!(matches!(
            parsed.into_first_route(),
            Err(AppError::NoRouteFound(_))
        ));
    }

    #[test]
    fn test_first_route_is_used() {
        let body = r#"{
            "code": "Ok",
            "routes": [
                {"distance": 1500.0, "duration": 120.0,
                 "geometry": {"type": "LineString", "coordinates": [[145.1, -37.9], [145.2, -37.8]]}},
                {"distance": 9000.0, "duration": 600.0,
                 "geometry": {"type": "LineString", "coordinates": []}}
            ]
        }"#;
        let parsed: MapboxDirectionsApiResponse = serde_json::from_str(body).unwrap();
        let directions = parsed.into_first_route().unwrap();
        assert_eq!(directions.distance_km(), 1.5);
        assert_eq!(directions.geometry.len(), 2);
    }

    #[test]
    fn test_http_error_classification() {
        let msg = || "x".to_string();
        assert!(matches!(
            classify_http_error(StatusCode::SERVICE_UNAVAILABLE, msg()),
            AppError::ProviderUnavailable(_)
        ));
        assert!(matches!(
            classify_http_error(StatusCode::TOO_MANY_REQUESTS, msg()),
            AppError::ProviderUnavailable(_)
        ));
        assert!(matches!(
            classify_http_error(StatusCode::UNAUTHORIZED, msg()),
            AppError::ProviderUnavailable(_)
        ));
        assert!(matches!(
            classify_http_error(StatusCode::UNPROCESSABLE_ENTITY, msg()),
            AppError::NoRouteFound(_)
        ));
    }
}
