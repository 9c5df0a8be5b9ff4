use chrono::{NaiveDate, NaiveTime};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

// Opaque identifiers issued by the store
macro_rules! opaque_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Generate a fresh random identifier
            pub fn generate() -> Self {
                let value: u64 = rand::thread_rng().gen();
                Self(format!("{}-{:016x}", $prefix, value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

opaque_id!(ClassroomId, "room");
opaque_id!(TimeslotId, "ts");
opaque_id!(ReservationId, "res");
opaque_id!(UserId, "user");

/// Day of the week a recurring timeslot belongs to.
///
/// The ordinal table runs Sunday=0 through Saturday=6 and does not depend
/// on the host locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayOfWeek {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Sunday,
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
    ];

    /// Look up a day by its ordinal, Sunday being 0
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DayOfWeek::Sunday => "Sunday",
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
    Lecture,
    Lab,
    Seminar,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classroom {
    pub id: ClassroomId,
    pub name: String,
    pub building: String,
    pub floor: Option<i32>,
    pub capacity: u32,
    #[serde(rename = "type")]
    pub room_type: RoomType,
    pub resources: Vec<String>,
    pub is_active: bool,
}

// Recurring weekly template, not tied to a calendar date
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeslot {
    pub id: TimeslotId,
    pub day_of_week: DayOfWeek,
    #[serde(serialize_with = "wall_clock::serialize")]
    pub start_time: NaiveTime,
    #[serde(serialize_with = "wall_clock::serialize")]
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Confirmed,
    Pending,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: ReservationId,
    pub classroom: ClassroomId,
    pub timeslot: TimeslotId,
    pub date: NaiveDate,
    pub reserved_for: String,
    pub created_by: UserId,
    pub status: ReservationStatus,
}

/// Wall-clock `HH:MM` formatting for timeslot bounds
pub mod wall_clock {
    use chrono::NaiveTime;
    use serde::Serializer;

    pub const FORMAT: &str = "%H:%M";

    pub fn parse(value: &str) -> Result<NaiveTime, chrono::ParseError> {
        NaiveTime::parse_from_str(value, FORMAT)
    }

    pub fn format(time: &NaiveTime) -> String {
        time.format(FORMAT).to_string()
    }

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format(time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_of_week_ordinal_table() {
        assert_eq!(DayOfWeek::from_index(0), Some(DayOfWeek::Sunday));
        assert_eq!(DayOfWeek::from_index(6), Some(DayOfWeek::Saturday));
        assert_eq!(DayOfWeek::from_index(7), None);

        for (i, day) in DayOfWeek::ALL.iter().enumerate() {
            assert_eq!(day.index(), i);
        }
    }

    #[test]
    fn test_wall_clock_format() {
        let time = wall_clock::parse("08:00").unwrap();
        assert_eq!(wall_clock::format(&time), "08:00");
        assert!(wall_clock::parse("25:00").is_err());
        assert!(wall_clock::parse("8am").is_err());
    }

    #[test]
    fn test_generated_ids_are_prefixed() {
        let id = TimeslotId::generate();
        assert!(id.as_str().starts_with("ts-"));
        assert_ne!(id, TimeslotId::generate());
    }
}
