//! Classroom Availability Service
//!
//! Answers "which classrooms are free in which timeslots on a given date"
//! from three collections: classrooms, weekly recurring timeslots and
//! date-specific reservations.
//!
//! # Modules
//!
//! - `services::weekday`: date validation and the Sunday=0 weekday table
//! - `services::availability`: candidate loading and reservation subtraction
//! - `services::store`: the `FacilityStore` trait the computation reads from
//! - `services::database`: CSV-backed `FacilityStore`
//! - `handlers` / `routes`: the HTTP surface

pub mod config;
pub mod error;
pub mod routes;

pub mod models {
    pub mod availability;
    pub mod common;
    pub mod facility;
}

pub mod services {
    pub mod availability;
    pub mod database;
    pub mod store;
    pub mod weekday;

    #[cfg(test)]
    mod availability_test;
    #[cfg(test)]
    mod database_test;
}

pub mod handlers {
    pub mod api;
    pub mod health;

    #[cfg(test)]
    mod api_test;
}

#[cfg(test)]
pub mod store_mock;

// Re-export the main API types for ease of use
pub use config::AppConfig;
pub use error::{AvailabilityError, StoreError};
pub use handlers::api::AppState;
pub use routes::create_router;
pub use services::availability::get_availability;
pub use services::database::CsvFacilityStore;
pub use services::store::FacilityStore;
