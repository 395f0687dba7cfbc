use axum::Router;
use roadtrip::config::Config;
use roadtrip::services::directions::DirectionsProvider;
use roadtrip::services::geocoding::{MapboxGeocoder, PlaceSearch};
use roadtrip::services::mapbox::{AuthMode, MapboxClient};
use roadtrip::services::route_accumulator::RouteAccumulator;
use roadtrip::store::{FileStore, KeyValueStore, RedisStore, VacationRepository};
use roadtrip::AppState;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const REDIS_KEY_PREFIX: &str = "roadtrip:";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roadtrip=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| format!("Failed to load configuration: {}", e))?;

    tracing::info!("Starting roadtrip planner API server");
    tracing::info!("Configuration loaded successfully");

    // Vacation storage: try Redis, fall back to files under DATA_DIR
    let store: Arc<dyn KeyValueStore> = if let Some(ref redis_url) = config.redis_url {
        tracing::info!("Connecting to Redis store...");
        match RedisStore::new(redis_url, REDIS_KEY_PREFIX).await {
            Ok(redis_store) => Arc::new(redis_store),
            Err(e) => {
                tracing::warn!(
                    "Failed to connect to Redis: {}. Falling back to file storage in {}.",
                    e,
                    config.data_dir
                );
                Arc::new(FileStore::new(&config.data_dir).await?)
            }
        }
    } else {
        tracing::info!("Redis URL not configured. Using file storage in {}.", config.data_dir);
        Arc::new(FileStore::new(&config.data_dir).await?)
    };

    // Initialize services
    let mapbox_client = if let Some(ref base_url) = config.mapbox_directions_url {
        MapboxClient::with_config(
            config.mapbox_api_key.clone(),
            base_url.clone(),
            AuthMode::BearerHeader,
        )
    } else {
        MapboxClient::new(config.mapbox_api_key.clone())
    };
    let geocoder = if let Some(ref base_url) = config.mapbox_geocoding_url {
        MapboxGeocoder::with_base_url(config.mapbox_api_key.clone(), base_url.clone())
    } else {
        MapboxGeocoder::new(config.mapbox_api_key.clone())
    };

    let directions: Arc<dyn DirectionsProvider> = Arc::new(mapbox_client);
    let places: Arc<dyn PlaceSearch> = Arc::new(geocoder);

    // Create application state
    let state = Arc::new(AppState {
        accumulator: RouteAccumulator::new(directions),
        places,
        vacations: VacationRepository::new(store),
        drafts: roadtrip::draft_plan_cache(config.draft_plan_ttl, config.draft_plan_max_entries),
        poi_search_limit: config.poi_search_limit,
    });

    // Build router with CORS and tracing
    let app = Router::new()
        .nest("/api/v1", roadtrip::routes::create_router(state))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = config.server_address();
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
