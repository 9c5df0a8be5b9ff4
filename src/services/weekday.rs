use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::error::AvailabilityError;
use crate::models::facility::DayOfWeek;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Resolve a `YYYY-MM-DD` string to its weekday and calendar date.
///
/// Impossible dates such as `2024-02-31` are rejected rather than rolled
/// over into the next month. The input must also be in canonical form, so
/// `2024-1-1` or a string with surrounding whitespace is refused.
pub fn resolve_weekday(date_input: &str) -> Result<(DayOfWeek, NaiveDate), AvailabilityError> {
    let date = NaiveDate::parse_from_str(date_input, DATE_FORMAT)
        .map_err(|_| AvailabilityError::InvalidDate(date_input.to_string()))?;

    if date.format(DATE_FORMAT).to_string() != date_input {
        return Err(AvailabilityError::InvalidDate(date_input.to_string()));
    }

    let index = date.weekday().num_days_from_sunday() as usize;
    let day = DayOfWeek::from_index(index)
        .ok_or_else(|| AvailabilityError::InvalidDate(date_input.to_string()))?;

    debug!("Resolved {} to {}", date, day);
    Ok((day, date))
}
