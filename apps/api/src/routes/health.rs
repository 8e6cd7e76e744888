use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version and whether skill
/// demand has been computed yet.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "navigator-api",
        "demand_cached": state.demand.is_warm().await
    }))
}

/// GET /
/// Service banner listing the available endpoints.
pub async fn index_handler() -> Json<Value> {
    Json(json!({
        "message": "Welcome to Data Science Navigator API",
        "available_endpoints": {
            "GET /health": "API health check",
            "GET /skills-demand": "Current in-demand skills with counts",
            "POST /skills-demand/refresh": "Recompute skill counts from the jobs dataset",
            "GET /demand-rank": "Demand rank per skill (1 = most demanded, 0 = unranked)",
            "POST /detect-gap": "Missing skills sorted by market demand",
            "POST /upload-resume": "Upload a plain-text resume and extract skills",
            "GET /resume-gaps": "Gap reports for the resume dataset",
            "GET /ui": "Serve the frontend UI"
        }
    }))
}
