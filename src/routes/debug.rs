use crate::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

/// GET /debug/health - Check if services are working
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let mut status = json!({
        "status": "ok",
        "checks": {}
    });

    // Check vacation storage
    let backend = state.vacations.backend_name();
    if state.vacations.health_check().await {
        status["checks"]["storage"] = json!({"backend": backend, "status": "ok"});
    } else {
        status["checks"]["storage"] = json!({"backend": backend, "status": "unreachable"});
        status["status"] = json!("error");
    }

    // Stored vacations are readable
    match state.vacations.load().await {
        Ok(list) => {
            status["checks"]["vacation_count"] = json!(list.len());
        }
        Err(e) => {
            status["checks"]["vacation_count"] = json!({"error": e.to_string()});
            status["status"] = json!("error");
        }
    }

    status["checks"]["draft_plans"] = json!(state.drafts.entry_count());

    Json(status)
}
