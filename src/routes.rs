use axum::{routing::get, Router};
use std::sync::Arc;
use tracing::info;

use crate::handlers::api::{get_classroom_availability, get_database_stats, AppState};
use crate::handlers::health::health_check;

pub fn create_router(app_state: Arc<AppState>) -> Router {
    // More specific routes first
    let facilities_routes = Router::new()
        .route("/classrooms/availability", get(get_classroom_availability))
        .route("/stats", get(get_database_stats));

    info!("Facilities routes mounted under /api/facilities");

    Router::new()
        .route("/api/health", get(health_check))
        .nest("/api/facilities", facilities_routes)
        .with_state(app_state)
}
