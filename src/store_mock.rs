use async_trait::async_trait;
use chrono::NaiveDate;
use mockall::mock;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::StoreError;
use crate::models::availability::RecordCounts;
use crate::models::facility::{
    wall_clock, Classroom, ClassroomId, DayOfWeek, Reservation, ReservationId, ReservationStatus,
    RoomType, Timeslot, TimeslotId, UserId,
};
use crate::services::store::FacilityStore;

// Define a mock store for call-count assertions
mock! {
    pub Store {}

    #[async_trait]
    impl FacilityStore for Store {
        async fn find_active_classrooms(&self) -> Result<Vec<Classroom>, StoreError>;

        async fn find_timeslots_by_weekday(
            &self,
            day: DayOfWeek,
        ) -> Result<Vec<Timeslot>, StoreError>;

        async fn find_reservations(
            &self,
            date: NaiveDate,
            classroom_ids: &[ClassroomId],
            timeslot_ids: &[TimeslotId],
        ) -> Result<Vec<Reservation>, StoreError>;

        async fn count_records(&self) -> Result<RecordCounts, StoreError>;
    }
}

// A simple in-memory store that applies the same filters as the CSV store
#[derive(Default)]
pub struct InMemoryStore {
    pub classrooms: Vec<Classroom>,
    pub timeslots: Vec<Timeslot>,
    pub reservations: Vec<Reservation>,
    reservation_queries: AtomicUsize,
}

impl InMemoryStore {
    pub fn new(
        classrooms: Vec<Classroom>,
        timeslots: Vec<Timeslot>,
        reservations: Vec<Reservation>,
    ) -> Self {
        Self {
            classrooms,
            timeslots,
            reservations,
            reservation_queries: AtomicUsize::new(0),
        }
    }

    pub fn reservation_queries(&self) -> usize {
        self.reservation_queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FacilityStore for InMemoryStore {
    async fn find_active_classrooms(&self) -> Result<Vec<Classroom>, StoreError> {
        Ok(self
            .classrooms
            .iter()
            .filter(|c| c.is_active)
            .cloned()
            .collect())
    }

    async fn find_timeslots_by_weekday(
        &self,
        day: DayOfWeek,
    ) -> Result<Vec<Timeslot>, StoreError> {
        Ok(self
            .timeslots
            .iter()
            .filter(|t| t.day_of_week == day)
            .cloned()
            .collect())
    }

    async fn find_reservations(
        &self,
        date: NaiveDate,
        classroom_ids: &[ClassroomId],
        timeslot_ids: &[TimeslotId],
    ) -> Result<Vec<Reservation>, StoreError> {
        self.reservation_queries.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .reservations
            .iter()
            .filter(|r| {
                r.date == date
                    && classroom_ids.contains(&r.classroom)
                    && timeslot_ids.contains(&r.timeslot)
            })
            .cloned()
            .collect())
    }

    async fn count_records(&self) -> Result<RecordCounts, StoreError> {
        Ok(RecordCounts {
            classrooms: self.classrooms.len(),
            reservations: self.reservations.len(),
            timeslots: self.timeslots.len(),
        })
    }
}

/// Generate an active lecture room for testing purposes
pub fn test_classroom(id: &str, name: &str) -> Classroom {
    Classroom {
        id: ClassroomId::new(id),
        name: name.to_string(),
        building: "Main Building".to_string(),
        floor: Some(1),
        capacity: 30,
        room_type: RoomType::Lecture,
        resources: vec!["projector".to_string()],
        is_active: true,
    }
}

pub fn test_timeslot(id: &str, day: DayOfWeek, start: &str, end: &str) -> Timeslot {
    Timeslot {
        id: TimeslotId::new(id),
        day_of_week: day,
        start_time: wall_clock::parse(start).unwrap(),
        end_time: wall_clock::parse(end).unwrap(),
    }
}

pub fn test_reservation(classroom: &str, timeslot: &str, date: &str) -> Reservation {
    Reservation {
        id: ReservationId::generate(),
        classroom: ClassroomId::new(classroom),
        timeslot: TimeslotId::new(timeslot),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        reserved_for: "Test Reservation".to_string(),
        created_by: UserId::new("admin"),
        status: ReservationStatus::Confirmed,
    }
}
