use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use crate::models::facility::{wall_clock, Classroom, ClassroomId, DayOfWeek, TimeslotId};

// Narrowed projection of a classroom that is free in a slot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvailableRoom {
    pub id: ClassroomId,
    pub name: String,
    pub building: String,
    pub capacity: u32,
}

impl From<&Classroom> for AvailableRoom {
    fn from(room: &Classroom) -> Self {
        Self {
            id: room.id.clone(),
            name: room.name.clone(),
            building: room.building.clone(),
            capacity: room.capacity,
        }
    }
}

// One entry per timeslot of the resolved weekday
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotAvailability {
    pub timeslot_id: TimeslotId,
    pub day_of_week: DayOfWeek,
    #[serde(serialize_with = "wall_clock::serialize")]
    pub start_time: NaiveTime,
    #[serde(serialize_with = "wall_clock::serialize")]
    pub end_time: NaiveTime,
    pub available_rooms: Vec<AvailableRoom>,
}

/// Free rooms per timeslot for a single calendar date.
///
/// Recomputed on every request and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResult {
    pub date: NaiveDate,
    pub day_of_week: DayOfWeek,
    pub slots: Vec<SlotAvailability>,
}

impl AvailabilityResult {
    pub fn empty(date: NaiveDate, day_of_week: DayOfWeek) -> Self {
        Self {
            date,
            day_of_week,
            slots: Vec::new(),
        }
    }
}

// Row counts reported by the stats endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RecordCounts {
    pub classrooms: usize,
    pub reservations: usize,
    pub timeslots: usize,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub stats: RecordCounts,
}
