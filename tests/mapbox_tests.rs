use roadtrip::models::{Coordinates, PoiCategory};
use roadtrip::services::directions::DirectionsProvider;
use roadtrip::services::geocoding::MapboxGeocoder;
use roadtrip::services::mapbox::MapboxClient;
use roadtrip::services::route_accumulator::RouteAccumulator;

mod common;

fn api_key() -> String {
    std::env::var("MAPBOX_API_KEY").expect("MAPBOX_API_KEY must be set for integration tests")
}

#[tokio::test]
async fn test_mapbox_driving_leg() {
    if common::should_skip_real_api_tests() {
        println!("Skipping real API test");
        return;
    }

    let client = MapboxClient::new(api_key());

    // Melbourne CBD to Geelong waterfront
    let melbourne = Coordinates::new(-37.8136, 144.9631).unwrap();
    let geelong = Coordinates::new(-38.1499, 144.3617).unwrap();

    let leg = client.get_leg(melbourne, geelong).await;
    assert!(leg.is_ok(), "Mapbox API call should succeed");

    let leg = leg.unwrap();
    assert!(!leg.path.is_empty(), "Geometry should not be empty");

    // Driving is about 75km by the freeway
    assert!(
        leg.distance_km > 60.0 && leg.distance_km < 100.0,
        "Distance should be reasonable: got {}km",
        leg.distance_km
    );
}

#[tokio::test]
async fn test_mapbox_route_accumulation() {
    if common::should_skip_real_api_tests() {
        println!("Skipping real API test");
        return;
    }

    let mut route = common::route_from_melbourne("Minibus", 450.0);
    route.add_stopover(common::geelong());
    route.add_stopover(common::sydney());
    route.add_stopover(common::ballarat());

    let accumulator = RouteAccumulator::new(MapboxClient::new(api_key()));
    let report = accumulator.accumulate(&mut route).await.unwrap();

    assert_eq!(route.num_stops(), 2);
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].original_index, 1);
    assert!(route.total_distance() > 100.0 && route.total_distance() < 300.0);
}

#[tokio::test]
async fn test_mapbox_nearby_fuel() {
    if common::should_skip_real_api_tests() {
        println!("Skipping real API test");
        return;
    }

    let geocoder = MapboxGeocoder::new(api_key());
    let center = Coordinates::new(-37.8136, 144.9631).unwrap();

    let pois = geocoder
        .search_nearby(center, PoiCategory::GasStation, 5)
        .await
        .unwrap();

    assert!(pois.len() <= 5);
    for poi in &pois {
        assert!(poi.is_refueling());
        assert!(poi.coordinates().distance_to(&center) < 100.0);
    }
}
