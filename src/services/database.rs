use async_trait::async_trait;
use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::models::availability::RecordCounts;
use crate::models::facility::{
    wall_clock, Classroom, ClassroomId, DayOfWeek, Reservation, ReservationId, ReservationStatus,
    RoomType, Timeslot, TimeslotId, UserId,
};
use crate::services::store::FacilityStore;

pub const CLASSROOMS_FILE: &str = "classrooms.csv";
pub const TIMESLOTS_FILE: &str = "timeslots.csv";
pub const RESERVATIONS_FILE: &str = "reservations.csv";

const CLASSROOM_HEADERS: [&str; 8] = [
    "id",
    "name",
    "building",
    "floor",
    "capacity",
    "room_type",
    "resources",
    "is_active",
];
const TIMESLOT_HEADERS: [&str; 4] = ["id", "day_of_week", "start_time", "end_time"];
const RESERVATION_HEADERS: [&str; 7] = [
    "id",
    "classroom_id",
    "timeslot_id",
    "date",
    "reserved_for",
    "created_by",
    "status",
];

// Separator for the resources column
const RESOURCE_SEPARATOR: char = ';';

// Row of classrooms.csv
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ClassroomRecord {
    pub id: String,
    pub name: String,
    pub building: String,
    pub floor: Option<i32>,
    pub capacity: u32,
    pub room_type: RoomType,
    pub resources: String,
    pub is_active: bool,
}

// Row of timeslots.csv
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TimeslotRecord {
    pub id: String,
    pub day_of_week: DayOfWeek,
    pub start_time: String, // HH:MM
    pub end_time: String,   // HH:MM
}

// Row of reservations.csv
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ReservationRecord {
    pub id: String,
    pub classroom_id: String,
    pub timeslot_id: String,
    pub date: NaiveDate, // YYYY-MM-DD
    pub reserved_for: String,
    pub created_by: String,
    pub status: ReservationStatus,
}

impl TryFrom<ClassroomRecord> for Classroom {
    type Error = StoreError;

    fn try_from(record: ClassroomRecord) -> Result<Self, Self::Error> {
        if record.capacity == 0 {
            return Err(StoreError::InvalidRecord {
                file: CLASSROOMS_FILE,
                reason: format!("classroom {} has zero capacity", record.id),
            });
        }

        let resources = record
            .resources
            .split(RESOURCE_SEPARATOR)
            .map(str::trim)
            .filter(|resource| !resource.is_empty())
            .map(String::from)
            .collect();

        Ok(Classroom {
            id: ClassroomId::new(record.id),
            name: record.name,
            building: record.building,
            floor: record.floor,
            capacity: record.capacity,
            room_type: record.room_type,
            resources,
            is_active: record.is_active,
        })
    }
}

impl From<&Classroom> for ClassroomRecord {
    fn from(classroom: &Classroom) -> Self {
        Self {
            id: classroom.id.to_string(),
            name: classroom.name.clone(),
            building: classroom.building.clone(),
            floor: classroom.floor,
            capacity: classroom.capacity,
            room_type: classroom.room_type,
            resources: classroom.resources.join(&RESOURCE_SEPARATOR.to_string()),
            is_active: classroom.is_active,
        }
    }
}

impl TryFrom<TimeslotRecord> for Timeslot {
    type Error = StoreError;

    fn try_from(record: TimeslotRecord) -> Result<Self, Self::Error> {
        let parse = |value: &str| {
            wall_clock::parse(value).map_err(|e| StoreError::InvalidRecord {
                file: TIMESLOTS_FILE,
                reason: format!("timeslot {} has bad time {:?}: {}", record.id, value, e),
            })
        };

        let start_time = parse(&record.start_time)?;
        let end_time = parse(&record.end_time)?;

        if start_time >= end_time {
            return Err(StoreError::InvalidRecord {
                file: TIMESLOTS_FILE,
                reason: format!(
                    "timeslot {} starts at {} but ends at {}",
                    record.id, record.start_time, record.end_time
                ),
            });
        }

        Ok(Timeslot {
            id: TimeslotId::new(record.id),
            day_of_week: record.day_of_week,
            start_time,
            end_time,
        })
    }
}

impl From<&Timeslot> for TimeslotRecord {
    fn from(timeslot: &Timeslot) -> Self {
        Self {
            id: timeslot.id.to_string(),
            day_of_week: timeslot.day_of_week,
            start_time: wall_clock::format(&timeslot.start_time),
            end_time: wall_clock::format(&timeslot.end_time),
        }
    }
}

impl From<ReservationRecord> for Reservation {
    fn from(record: ReservationRecord) -> Self {
        Reservation {
            id: ReservationId::new(record.id),
            classroom: ClassroomId::new(record.classroom_id),
            timeslot: TimeslotId::new(record.timeslot_id),
            date: record.date,
            reserved_for: record.reserved_for,
            created_by: UserId::new(record.created_by),
            status: record.status,
        }
    }
}

impl From<&Reservation> for ReservationRecord {
    fn from(reservation: &Reservation) -> Self {
        Self {
            id: reservation.id.to_string(),
            classroom_id: reservation.classroom.to_string(),
            timeslot_id: reservation.timeslot.to_string(),
            date: reservation.date,
            reserved_for: reservation.reserved_for.clone(),
            created_by: reservation.created_by.to_string(),
            status: reservation.status,
        }
    }
}

/// Facility store backed by three CSV files in a data directory.
///
/// File access within one process happens under a mutex. Rewrites go to a
/// temporary file in the data directory that is then renamed over the
/// target, so readers in other processes see either the old or the new
/// contents and never a truncated file.
pub struct CsvFacilityStore {
    data_dir: PathBuf,
    file_mutex: Mutex<()>,
}

impl CsvFacilityStore {
    /// Open the store, creating the directory and any missing files with
    /// their headers
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let data_dir = data_dir.as_ref().to_path_buf();

        fs::create_dir_all(&data_dir).map_err(|source| StoreError::Io {
            path: data_dir.display().to_string(),
            source,
        })?;

        let store = Self {
            data_dir,
            file_mutex: Mutex::new(()),
        };

        store.ensure_file(CLASSROOMS_FILE, &CLASSROOM_HEADERS)?;
        store.ensure_file(TIMESLOTS_FILE, &TIMESLOT_HEADERS)?;
        store.ensure_file(RESERVATIONS_FILE, &RESERVATION_HEADERS)?;

        info!("Facility store opened at {}", store.data_dir.display());
        Ok(store)
    }

    /// All classrooms, active or not, in file order
    pub fn find_all_classrooms(&self) -> Result<Vec<Classroom>, StoreError> {
        let _lock = self.lock()?;
        self.read_records::<ClassroomRecord>(CLASSROOMS_FILE)?
            .into_iter()
            .map(Classroom::try_from)
            .collect()
    }

    /// All timeslots of every weekday in file order
    pub fn find_all_timeslots(&self) -> Result<Vec<Timeslot>, StoreError> {
        let _lock = self.lock()?;
        self.read_records::<TimeslotRecord>(TIMESLOTS_FILE)?
            .into_iter()
            .map(Timeslot::try_from)
            .collect()
    }

    pub fn insert_classrooms(&self, classrooms: &[Classroom]) -> Result<(), StoreError> {
        let _lock = self.lock()?;
        let records: Vec<ClassroomRecord> = classrooms.iter().map(ClassroomRecord::from).collect();
        self.append_records(CLASSROOMS_FILE, &records)
    }

    /// Replace the whole timeslot table
    pub fn replace_timeslots(&self, timeslots: &[Timeslot]) -> Result<(), StoreError> {
        let _lock = self.lock()?;
        let records: Vec<TimeslotRecord> = timeslots.iter().map(TimeslotRecord::from).collect();
        self.write_records(TIMESLOTS_FILE, &TIMESLOT_HEADERS, &records)
    }

    pub fn insert_reservations(&self, reservations: &[Reservation]) -> Result<(), StoreError> {
        let _lock = self.lock()?;
        let records: Vec<ReservationRecord> =
            reservations.iter().map(ReservationRecord::from).collect();
        self.append_records(RESERVATIONS_FILE, &records)
    }

    /// Delete every reservation of one classroom on one date, returning how
    /// many rows were removed
    pub fn delete_reservations_for(
        &self,
        classroom_id: &ClassroomId,
        date: NaiveDate,
    ) -> Result<usize, StoreError> {
        let _lock = self.lock()?;

        let records = self.read_records::<ReservationRecord>(RESERVATIONS_FILE)?;
        let before = records.len();

        let kept: Vec<ReservationRecord> = records
            .into_iter()
            .filter(|r| !(r.classroom_id == classroom_id.as_str() && r.date == date))
            .collect();
        let removed = before - kept.len();

        if removed > 0 {
            self.write_records(RESERVATIONS_FILE, &RESERVATION_HEADERS, &kept)?;
            info!(
                "Deleted {} reservations for classroom {} on {}",
                removed, classroom_id, date
            );
        }

        Ok(removed)
    }

    fn path(&self, file: &str) -> PathBuf {
        self.data_dir.join(file)
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>, StoreError> {
        self.file_mutex.lock().map_err(|_| StoreError::LockPoisoned)
    }

    fn io_error(&self, file: &str, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path(file).display().to_string(),
            source,
        }
    }

    // Create the CSV file with headers if it doesn't exist
    fn ensure_file(&self, file: &str, headers: &[&str]) -> Result<(), StoreError> {
        let path = self.path(file);
        if path.exists() {
            return Ok(());
        }

        info!("Creating new store file at {}", path.display());
        self.write_records::<()>(file, headers, &[])
    }

    // Stream rows of a file, keeping those `select` maps to Some
    fn scan<R, T, F>(&self, file: &str, mut select: F) -> Result<Vec<T>, StoreError>
    where
        R: DeserializeOwned,
        F: FnMut(R) -> Result<Option<T>, StoreError>,
    {
        let reader = File::open(self.path(file)).map_err(|e| self.io_error(file, e))?;
        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(reader);

        let mut selected = Vec::new();
        for result in reader.deserialize::<R>() {
            if let Some(item) = select(result?)? {
                selected.push(item);
            }
        }

        debug!("Selected {} rows from {}", selected.len(), file);
        Ok(selected)
    }

    fn read_records<R: DeserializeOwned>(&self, file: &str) -> Result<Vec<R>, StoreError> {
        self.scan(file, |record: R| Ok(Some(record)))
    }

    fn count_rows(&self, file: &str) -> Result<usize, StoreError> {
        let reader = File::open(self.path(file)).map_err(|e| self.io_error(file, e))?;
        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(reader);

        let mut count = 0;
        for result in reader.records() {
            result?;
            count += 1;
        }
        Ok(count)
    }

    // Replace the file with headers followed by `records`
    fn write_records<R: Serialize>(
        &self,
        file: &str,
        headers: &[&str],
        records: &[R],
    ) -> Result<(), StoreError> {
        let staged = NamedTempFile::new_in(&self.data_dir).map_err(|e| self.io_error(file, e))?;
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_writer(staged);

        writer.write_record(headers)?;
        for record in records {
            writer.serialize(record)?;
        }

        let staged = writer
            .into_inner()
            .map_err(|e| self.io_error(file, e.into_error()))?;
        staged
            .as_file()
            .sync_all()
            .map_err(|e| self.io_error(file, e))?;
        staged
            .persist(self.path(file))
            .map_err(|e| self.io_error(file, e.error))?;

        debug!("Wrote {} rows to {}", records.len(), file);
        Ok(())
    }

    fn append_records<R: Serialize>(&self, file: &str, records: &[R]) -> Result<(), StoreError> {
        let handle = OpenOptions::new()
            .append(true)
            .open(self.path(file))
            .map_err(|e| self.io_error(file, e))?;
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(handle);

        for record in records {
            writer.serialize(record)?;
        }
        writer.flush().map_err(|e| self.io_error(file, e))?;

        info!("Stored {} rows in {}", records.len(), file);
        Ok(())
    }
}

#[async_trait]
impl FacilityStore for CsvFacilityStore {
    async fn find_active_classrooms(&self) -> Result<Vec<Classroom>, StoreError> {
        let _lock = self.lock()?;
        self.scan(CLASSROOMS_FILE, |record: ClassroomRecord| {
            if record.is_active {
                Classroom::try_from(record).map(Some)
            } else {
                Ok(None)
            }
        })
    }

    async fn find_timeslots_by_weekday(
        &self,
        day: DayOfWeek,
    ) -> Result<Vec<Timeslot>, StoreError> {
        let _lock = self.lock()?;
        self.scan(TIMESLOTS_FILE, |record: TimeslotRecord| {
            if record.day_of_week == day {
                Timeslot::try_from(record).map(Some)
            } else {
                Ok(None)
            }
        })
    }

    async fn find_reservations(
        &self,
        date: NaiveDate,
        classroom_ids: &[ClassroomId],
        timeslot_ids: &[TimeslotId],
    ) -> Result<Vec<Reservation>, StoreError> {
        let classrooms: HashSet<&str> = classroom_ids.iter().map(ClassroomId::as_str).collect();
        let timeslots: HashSet<&str> = timeslot_ids.iter().map(TimeslotId::as_str).collect();

        let _lock = self.lock()?;
        self.scan(RESERVATIONS_FILE, |record: ReservationRecord| {
            let in_scope = record.date == date
                && classrooms.contains(record.classroom_id.as_str())
                && timeslots.contains(record.timeslot_id.as_str());
            Ok(in_scope.then(|| Reservation::from(record)))
        })
    }

    async fn count_records(&self) -> Result<RecordCounts, StoreError> {
        let _lock = self.lock()?;
        Ok(RecordCounts {
            classrooms: self.count_rows(CLASSROOMS_FILE)?,
            reservations: self.count_rows(RESERVATIONS_FILE)?,
            timeslots: self.count_rows(TIMESLOTS_FILE)?,
        })
    }
}
