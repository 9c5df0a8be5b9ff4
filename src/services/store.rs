use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::StoreError;
use crate::models::availability::RecordCounts;
use crate::models::facility::{Classroom, ClassroomId, DayOfWeek, Reservation, Timeslot, TimeslotId};

/// Read access to classrooms, timeslots and reservations.
///
/// Implementations return rows in their natural load order. The
/// availability computation derives its output order from that order, so
/// it must be stable for an unchanged store.
#[async_trait]
pub trait FacilityStore: Send + Sync {
    /// All classrooms whose active flag is set
    async fn find_active_classrooms(&self) -> Result<Vec<Classroom>, StoreError>;

    /// Timeslot templates recurring on the given weekday
    async fn find_timeslots_by_weekday(&self, day: DayOfWeek)
        -> Result<Vec<Timeslot>, StoreError>;

    /// Reservations on exactly `date` for one of the listed classrooms and
    /// one of the listed timeslots. Rows outside that scope are never
    /// returned.
    async fn find_reservations(
        &self,
        date: NaiveDate,
        classroom_ids: &[ClassroomId],
        timeslot_ids: &[TimeslotId],
    ) -> Result<Vec<Reservation>, StoreError>;

    async fn count_records(&self) -> Result<RecordCounts, StoreError>;
}
