use axum::response::Json;

use crate::models::common::HealthResponse;

// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        message: "Classroom availability service is running",
    })
}
