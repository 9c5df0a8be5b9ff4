//! Seed the CSV store with the default weekly timeslots and a set of test
//! reservations for the next date the first timeslot's weekday occurs.

use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use classroom_availability_service::models::facility::{
    wall_clock, DayOfWeek, Reservation, ReservationId, ReservationStatus, Timeslot, TimeslotId,
    UserId,
};
use classroom_availability_service::{CsvFacilityStore, StoreError};

// Default timetable written by `seed timeslots`
const DEFAULT_TIMESLOTS: [(DayOfWeek, &str, &str); 6] = [
    (DayOfWeek::Sunday, "08:00", "10:00"),
    (DayOfWeek::Sunday, "10:00", "12:00"),
    (DayOfWeek::Monday, "08:00", "10:00"),
    (DayOfWeek::Monday, "10:00", "12:00"),
    (DayOfWeek::Tuesday, "08:00", "10:00"),
    (DayOfWeek::Tuesday, "10:00", "12:00"),
];

#[derive(Parser, Debug)]
#[command(name = "seed", about = "Seed the classroom availability store")]
struct Cli {
    /// Directory holding the store's CSV files
    #[arg(long, env = "DATA_DIR", default_value = "./data")]
    data_dir: PathBuf,

    /// User recorded as the creator of seeded reservations
    #[arg(long, env = "SEED_USER_ID", default_value = "admin")]
    user_id: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replace all timeslots with the default timetable
    Timeslots,
    /// Book every timeslot of one weekday for the first classroom
    Reservations,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let created_by = UserId::new(cli.user_id);
    let today = Local::now().date_naive();

    let result = CsvFacilityStore::open(&cli.data_dir).and_then(|store| match cli.command {
        Some(Command::Timeslots) => seed_timeslots(&store),
        Some(Command::Reservations) => seed_reservations(&store, &created_by, today),
        None => seed_timeslots(&store)
            .and_then(|_| seed_reservations(&store, &created_by, today)),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("Seed error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn default_timeslots() -> Result<Vec<Timeslot>, StoreError> {
    DEFAULT_TIMESLOTS
        .iter()
        .map(|&(day, start, end)| -> Result<Timeslot, StoreError> {
            let parse = |value: &str| {
                wall_clock::parse(value).map_err(|e| StoreError::InvalidRecord {
                    file: "default timetable",
                    reason: e.to_string(),
                })
            };
            Ok(Timeslot {
                id: TimeslotId::generate(),
                day_of_week: day,
                start_time: parse(start)?,
                end_time: parse(end)?,
            })
        })
        .collect()
}

fn seed_timeslots(store: &CsvFacilityStore) -> Result<(), StoreError> {
    info!("Clearing existing timeslots...");
    let timeslots = default_timeslots()?;
    store.replace_timeslots(&timeslots)?;
    info!("Created {} timeslots", timeslots.len());
    Ok(())
}

/// First date on or after `today` falling on `day`
fn next_date_for_day(today: NaiveDate, day: DayOfWeek) -> NaiveDate {
    let today_index = today.weekday().num_days_from_sunday() as i64;
    let diff = (day.index() as i64 - today_index).rem_euclid(7);
    today + chrono::Duration::days(diff)
}

fn seed_reservations(
    store: &CsvFacilityStore,
    created_by: &UserId,
    today: NaiveDate,
) -> Result<(), StoreError> {
    let Some(classroom) = store.find_all_classrooms()?.into_iter().next() else {
        warn!("No classrooms found. Seed a classroom first.");
        return Ok(());
    };

    let timeslots = store.find_all_timeslots()?;
    let Some(day) = timeslots.first().map(|t| t.day_of_week) else {
        warn!("No timeslots found. Seed timeslots first.");
        return Ok(());
    };

    let date = next_date_for_day(today, day);
    info!(
        "Creating reservations for classroom {} on {} ({})",
        classroom.name, date, day
    );

    // Clear earlier seeds for that room/date so seeding is repeatable
    store.delete_reservations_for(&classroom.id, date)?;

    let reservations: Vec<Reservation> = timeslots
        .iter()
        .filter(|t| t.day_of_week == day)
        .map(|t| Reservation {
            id: ReservationId::generate(),
            classroom: classroom.id.clone(),
            timeslot: t.id.clone(),
            date,
            reserved_for: format!("Test Reservation - {}", classroom.name),
            created_by: created_by.clone(),
            status: ReservationStatus::Confirmed,
        })
        .collect();

    store.insert_reservations(&reservations)?;
    info!("Created {} reservations.", reservations.len());
    info!("Use this date in your availability API test: {}", date);
    Ok(())
}
