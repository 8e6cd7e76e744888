pub mod health;

use axum::{
    http::Uri,
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::errors::AppError;
use crate::skills::handlers;
use crate::state::AppState;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

pub fn build_router(state: AppState) -> Router {
    let ui = ServeDir::new(&state.config.ui_dir);

    Router::new()
        .route("/", get(health::index_handler))
        .route("/health", get(health::health_handler))
        // Skills API
        .route("/skills-demand", get(handlers::handle_skills_demand))
        .route(
            "/skills-demand/refresh",
            post(handlers::handle_refresh_demand),
        )
        .route("/demand-rank", get(handlers::handle_demand_rank))
        .route("/detect-gap", post(handlers::handle_detect_gap))
        .route("/upload-resume", post(handlers::handle_upload_resume))
        .route("/resume-gaps", get(handlers::handle_resume_gaps))
        // Static UI, served here to avoid CORS during development
        .nest_service("/ui", ui)
        .fallback(not_found)
        .with_state(state)
}
