//! Error types for store access and availability requests.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;
use tracing::error;

use crate::models::common::MessageResponse;

/// Failure reading from or writing to the facility store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid record in {file}: {reason}")]
    InvalidRecord { file: &'static str, reason: String },

    #[error("Failed to acquire store lock")]
    LockPoisoned,
}

#[derive(Error, Debug)]
pub enum AvailabilityError {
    #[error("Query parameter 'date' is required (YYYY-MM-DD)")]
    MissingDate,

    #[error("Invalid date format: {0:?}")]
    InvalidDate(String),

    #[error("{0}")]
    InvalidQuery(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        error!("Store failure: {}", self);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(MessageResponse {
                message: "Server error".to_string(),
            }),
        )
            .into_response()
    }
}

impl IntoResponse for AvailabilityError {
    fn into_response(self) -> Response {
        match self {
            AvailabilityError::Store(err) => err.into_response(),
            AvailabilityError::MissingDate => (
                StatusCode::BAD_REQUEST,
                Json(MessageResponse {
                    message: AvailabilityError::MissingDate.to_string(),
                }),
            )
                .into_response(),
            AvailabilityError::InvalidDate(_) => (
                StatusCode::BAD_REQUEST,
                Json(MessageResponse {
                    message: "Invalid date format".to_string(),
                }),
            )
                .into_response(),
            AvailabilityError::InvalidQuery(message) => (
                StatusCode::BAD_REQUEST,
                Json(MessageResponse { message }),
            )
                .into_response(),
        }
    }
}
