pub mod debug;
pub mod geocode;
pub mod plans;
pub mod pois;
pub mod vacations;

use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/vehicles", get(plans::list_vehicles))
        .route("/geocode/search", get(geocode::search))
        .route("/geocode/reverse", get(geocode::reverse))
        .route("/pois", get(pois::query_pois))
        .route("/plans", post(plans::create_plan))
        .route("/plans/{id}", get(plans::get_plan).delete(plans::cancel_plan))
        .route(
            "/plans/{id}/stopovers",
            post(plans::add_stopover).put(plans::reorder_stopovers),
        )
        .route("/plans/{id}/stopovers/{index}", delete(plans::remove_stopover))
        .route("/plans/{id}/save", post(plans::save_plan))
        .route("/vacations", get(vacations::list_vacations))
        .route("/vacations/current", get(vacations::current_vacation))
        .route(
            "/vacations/{index}",
            get(vacations::get_vacation).delete(vacations::delete_vacation),
        )
        .route("/vacations/{index}/path", get(vacations::vacation_path))
        .route("/debug/health", get(debug::health_check))
        .with_state(state)
}
