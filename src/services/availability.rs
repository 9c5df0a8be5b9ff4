use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::{debug, info};

use crate::error::{AvailabilityError, StoreError};
use crate::models::availability::{AvailabilityResult, AvailableRoom, SlotAvailability};
use crate::models::facility::{Classroom, ClassroomId, DayOfWeek, Reservation, Timeslot, TimeslotId};
use crate::services::store::FacilityStore;
use crate::services::weekday::resolve_weekday;

/// Free classrooms per timeslot on the given date.
///
/// The date is validated before the store is touched. When there are no
/// active classrooms or no timeslots on that weekday the result carries an
/// empty slot list and reservations are never queried.
pub async fn get_availability(
    store: &dyn FacilityStore,
    date_input: &str,
) -> Result<AvailabilityResult, AvailabilityError> {
    let (day, date) = resolve_weekday(date_input)?;

    let (classrooms, timeslots) = load_candidates(store, day).await?;

    if classrooms.is_empty() || timeslots.is_empty() {
        info!(
            "No candidates for {} ({}): {} active classrooms, {} timeslots",
            date,
            day,
            classrooms.len(),
            timeslots.len()
        );
        return Ok(AvailabilityResult::empty(date, day));
    }

    let result = compute_availability(store, date, day, &classrooms, &timeslots).await?;
    Ok(result)
}

/// Active classrooms and the weekday's timeslots, read concurrently
pub async fn load_candidates(
    store: &dyn FacilityStore,
    day: DayOfWeek,
) -> Result<(Vec<Classroom>, Vec<Timeslot>), StoreError> {
    let (classrooms, timeslots) = tokio::try_join!(
        store.find_active_classrooms(),
        store.find_timeslots_by_weekday(day),
    )?;

    debug!(
        "Loaded {} active classrooms and {} timeslots for {}",
        classrooms.len(),
        timeslots.len(),
        day
    );
    Ok((classrooms, timeslots))
}

/// Query the reservations scoped to the candidates and subtract them
pub async fn compute_availability(
    store: &dyn FacilityStore,
    date: NaiveDate,
    day: DayOfWeek,
    classrooms: &[Classroom],
    timeslots: &[Timeslot],
) -> Result<AvailabilityResult, StoreError> {
    let classroom_ids: Vec<ClassroomId> = classrooms.iter().map(|c| c.id.clone()).collect();
    let timeslot_ids: Vec<TimeslotId> = timeslots.iter().map(|t| t.id.clone()).collect();

    let reservations = store
        .find_reservations(date, &classroom_ids, &timeslot_ids)
        .await?;

    info!(
        "Found {} reservations on {} across {} classrooms and {} timeslots",
        reservations.len(),
        date,
        classroom_ids.len(),
        timeslot_ids.len()
    );

    Ok(subtract_reservations(
        date,
        day,
        classrooms,
        timeslots,
        &reservations,
    ))
}

/// Pair every timeslot with the classrooms not reserved in it.
///
/// Timeslots form the outer loop and classrooms the inner one, both in the
/// order given, so the output order never depends on set iteration. Every
/// reservation on `date` occupies its slot whatever its status.
pub fn subtract_reservations(
    date: NaiveDate,
    day: DayOfWeek,
    classrooms: &[Classroom],
    timeslots: &[Timeslot],
    reservations: &[Reservation],
) -> AvailabilityResult {
    let reserved: HashSet<(&ClassroomId, &TimeslotId)> = reservations
        .iter()
        .filter(|r| r.date == date)
        .map(|r| (&r.classroom, &r.timeslot))
        .collect();

    let slots = timeslots
        .iter()
        .map(|timeslot| SlotAvailability {
            timeslot_id: timeslot.id.clone(),
            day_of_week: day,
            start_time: timeslot.start_time,
            end_time: timeslot.end_time,
            available_rooms: classrooms
                .iter()
                .filter(|room| !reserved.contains(&(&room.id, &timeslot.id)))
                .map(AvailableRoom::from)
                .collect(),
        })
        .collect();

    AvailabilityResult {
        date,
        day_of_week: day,
        slots,
    }
}
