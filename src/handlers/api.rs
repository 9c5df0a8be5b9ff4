use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::Json,
};
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{AvailabilityError, StoreError};
use crate::models::availability::{AvailabilityResult, StatsResponse};
use crate::models::common::AvailabilityQuery;
use crate::services::availability::get_availability;
use crate::services::store::FacilityStore;

// AppState struct containing shared resources
pub struct AppState {
    pub store: Arc<dyn FacilityStore>,
}

// Classroom availability endpoint
pub async fn get_classroom_availability(
    State(state): State<Arc<AppState>>,
    query: Result<Query<AvailabilityQuery>, QueryRejection>,
) -> Result<Json<AvailabilityResult>, AvailabilityError> {
    let Query(params) = query.map_err(|rejection| {
        warn!("Rejected availability query: {}", rejection.body_text());
        AvailabilityError::InvalidQuery(rejection.body_text())
    })?;
    let date = params.date.ok_or(AvailabilityError::MissingDate)?;
    info!("Received request for classroom availability on {:?}", date);

    match get_availability(state.store.as_ref(), &date).await {
        Ok(result) => {
            info!(
                "Computed availability for {} ({}) with {} slots",
                result.date,
                result.day_of_week,
                result.slots.len()
            );
            Ok(Json(result))
        }
        Err(AvailabilityError::InvalidDate(input)) => {
            warn!("Rejected availability request with invalid date {:?}", input);
            Err(AvailabilityError::InvalidDate(input))
        }
        Err(err) => Err(err),
    }
}

// Database statistics endpoint
pub async fn get_database_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatsResponse>, StoreError> {
    let stats = state.store.count_records().await?;

    info!(
        "Reporting {} classrooms, {} reservations, {} timeslots",
        stats.classrooms, stats.reservations, stats.timeslots
    );

    Ok(Json(StatsResponse {
        success: true,
        stats,
    }))
}
