// Library exports for testing and reusability

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

// Re-export commonly used types
pub use error::{AppError, Result};

use models::Route;
use moka::future::Cache;
use services::directions::DirectionsProvider;
use services::geocoding::PlaceSearch;
use services::route_accumulator::RouteAccumulator;
use std::sync::Arc;
use std::time::Duration;
use store::VacationRepository;
use tokio::sync::Mutex;
use uuid::Uuid;

/// A plan being built. The mutex is held for the whole of an accumulation so
/// only one run touches a route at a time.
pub type DraftPlan = Arc<Mutex<Route>>;

/// Plans not yet saved as vacations. Entries left untouched for the configured
/// TTL are discarded.
pub type DraftPlans = Cache<Uuid, DraftPlan>;

pub fn draft_plan_cache(ttl_seconds: u64, max_entries: u64) -> DraftPlans {
    Cache::builder()
        .max_capacity(max_entries)
        .time_to_idle(Duration::from_secs(ttl_seconds))
        .build()
}

// App state for sharing across the application
pub struct AppState {
    pub accumulator: RouteAccumulator<Arc<dyn DirectionsProvider>>,
    pub places: Arc<dyn PlaceSearch>,
    pub vacations: VacationRepository,
    pub drafts: DraftPlans,
    pub poi_search_limit: u32,
}
