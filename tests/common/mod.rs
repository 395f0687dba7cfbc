use async_trait::async_trait;
use roadtrip::models::{Coordinates, PoiCategory, PointOfInterest, Route, Vehicle};
use roadtrip::services::directions::{DirectionsProvider, Leg};
use roadtrip::services::geocoding::PlaceSearch;
use roadtrip::services::route_accumulator::RouteAccumulator;
use roadtrip::store::{KeyValueStore, MemoryStore, VacationRepository};
use roadtrip::{AppError, AppState, Result};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Routes every leg as a straight line, great-circle distance in km.
/// Can be switched into a failing mode to simulate an outage.
#[allow(dead_code)]
#[derive(Default)]
pub struct StraightLine {
    failing: AtomicBool,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl StraightLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DirectionsProvider for StraightLine {
    async fn get_leg(&self, from: Coordinates, to: Coordinates) -> Result<Leg> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::ProviderUnavailable(
                "directions service offline".to_string(),
            ));
        }
        Ok(Leg {
            distance_km: from.distance_to(&to),
            path: vec![from, to],
        })
    }
}

/// Answers legs with fixed distances, in request order.
#[allow(dead_code)]
pub struct Scripted {
    distances: Mutex<VecDeque<f64>>,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl Scripted {
    pub fn new(distances: &[f64]) -> Self {
        Scripted {
            distances: Mutex::new(distances.iter().copied().collect()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DirectionsProvider for Scripted {
    async fn get_leg(&self, from: Coordinates, to: Coordinates) -> Result<Leg> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let distance_km = self
            .distances
            .lock()
            .unwrap()
            .pop_front()
            .expect("more leg requests than scripted distances");
        Ok(Leg {
            distance_km,
            path: vec![from, to],
        })
    }
}

/// Geocoder that knows a handful of Victorian places.
#[allow(dead_code)]
pub struct StubPlaces;

#[async_trait]
impl PlaceSearch for StubPlaces {
    async fn search_nearby(
        &self,
        _center: Coordinates,
        category: PoiCategory,
        limit: u32,
    ) -> Result<Vec<PointOfInterest>> {
        let pois = match category {
            PoiCategory::GasStation => vec![fuel_stop()],
            PoiCategory::Tourism => vec![geelong(), ballarat()],
            _ => vec![],
        };
        Ok(pois.into_iter().take(limit as usize).collect())
    }

    async fn search_address(&self, query: &str, _limit: u32) -> Result<Vec<PointOfInterest>> {
        if query.to_lowercase().contains("melbourne") {
            Ok(vec![melbourne()])
        } else {
            Ok(vec![])
        }
    }

    async fn reverse(&self, coordinates: Coordinates) -> Result<PointOfInterest> {
        PointOfInterest::location(coordinates.lat, coordinates.lng, "Somewhere VIC")
    }
}

#[allow(dead_code)]
pub fn melbourne() -> PointOfInterest {
    PointOfInterest::location(-37.8136, 144.9631, "Melbourne VIC 3000").unwrap()
}

#[allow(dead_code)]
pub fn geelong() -> PointOfInterest {
    PointOfInterest::new(
        -38.1499,
        144.3617,
        "Geelong VIC 3220",
        Some("Geelong Waterfront".to_string()),
        Some(PoiCategory::Tourism),
    )
    .unwrap()
}

#[allow(dead_code)]
pub fn ballarat() -> PointOfInterest {
    PointOfInterest::new(
        -37.5622,
        143.8503,
        "Ballarat VIC 3350",
        Some("Sovereign Hill".to_string()),
        Some(PoiCategory::Tourism),
    )
    .unwrap()
}

#[allow(dead_code)]
pub fn fuel_stop() -> PointOfInterest {
    PointOfInterest::new(
        -38.3387,
        143.5854,
        "Colac VIC 3250",
        Some("Colac Fuel".to_string()),
        Some(PoiCategory::GasStation),
    )
    .unwrap()
}

/// About 710 km from Melbourne: out of range for the smaller vehicles
#[allow(dead_code)]
pub fn sydney() -> PointOfInterest {
    PointOfInterest::new(
        -33.8568,
        151.2153,
        "Bennelong Point, Sydney NSW 2000",
        Some("Sydney Opera House".to_string()),
        Some(PoiCategory::Tourism),
    )
    .unwrap()
}

#[allow(dead_code)]
pub fn route_from_melbourne(vehicle_name: &str, range_km: f64) -> Route {
    Route::new(melbourne(), Vehicle::new(vehicle_name, range_km).unwrap())
}

/// In-memory store whose writes take a while, to widen race windows.
#[allow(dead_code)]
pub struct SlowStore {
    inner: MemoryStore,
    write_delay: Duration,
}

#[allow(dead_code)]
impl SlowStore {
    pub fn new(write_delay: Duration) -> Self {
        SlowStore {
            inner: MemoryStore::new(),
            write_delay,
        }
    }
}

#[async_trait]
impl KeyValueStore for SlowStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        tokio::time::sleep(self.write_delay).await;
        self.inner.set(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.inner.delete(key).await
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "slow-memory"
    }
}

#[allow(dead_code)]
pub fn test_app_state(directions: Arc<dyn DirectionsProvider>) -> Arc<AppState> {
    test_app_state_with_store(directions, Arc::new(MemoryStore::new()))
}

#[allow(dead_code)]
pub fn test_app_state_with_store(
    directions: Arc<dyn DirectionsProvider>,
    store: Arc<dyn KeyValueStore>,
) -> Arc<AppState> {
    Arc::new(AppState {
        accumulator: RouteAccumulator::new(directions),
        places: Arc::new(StubPlaces),
        vacations: VacationRepository::new(store),
        drafts: roadtrip::draft_plan_cache(60, 100),
        poi_search_limit: 10,
    })
}

/// Check if we should skip real API tests
#[allow(dead_code)]
pub fn should_skip_real_api_tests() -> bool {
    std::env::var("SKIP_REAL_API_TESTS").is_ok() || std::env::var("MAPBOX_API_KEY").is_err()
}
