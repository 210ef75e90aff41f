use std::fmt::Write;

use chrono::{
    DateTime, Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc,
};

use crate::errors::{ErrorKind, JsonDbError, JsonDbResult};

/// Date and time helpers over UTC timestamps.
///
/// Formats use `strftime` syntax (see [chrono::format::strftime]).
#[derive(Debug, Default, Clone, Copy)]
pub struct DateFunctions;

impl DateFunctions {
    /// Parses `value` with `format`.
    ///
    /// A format with an offset (`%z`) yields that instant in UTC. A format
    /// without one is read as UTC, and a date-only format as midnight.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if the value does not match the format.
    pub fn parse(&self, format: &str, value: &str) -> JsonDbResult<DateTime<Utc>> {
        if let Ok(date_time) = DateTime::parse_from_str(value, format) {
            return Ok(date_time.with_timezone(&Utc));
        }

        if let Ok(date_time) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(Utc.from_utc_datetime(&date_time));
        }

        match NaiveDate::parse_from_str(value, format) {
            Ok(date) => Ok(Utc.from_utc_datetime(&date.and_time(NaiveTime::default()))),
            Err(err) => {
                log::error!("Cannot parse {} with format {}: {}", value, format, err);
                Err(JsonDbError::new(
                    &format!("Cannot parse {} with format {}: {}", value, format, err),
                    ErrorKind::InvalidArgument,
                ))
            }
        }
    }

    /// Formats a timestamp.
    ///
    /// # Errors
    /// Returns `InvalidArgument` for a malformed format string.
    pub fn format(&self, date_time: &DateTime<Utc>, format: &str) -> JsonDbResult<String> {
        let mut formatted = String::new();
        match write!(formatted, "{}", date_time.format(format)) {
            Ok(()) => Ok(formatted),
            Err(_) => {
                log::error!("Invalid date format {}", format);
                Err(JsonDbError::new(
                    &format!("Invalid date format {}", format),
                    ErrorKind::InvalidArgument,
                ))
            }
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    pub fn add_days(&self, date_time: &DateTime<Utc>, days: i64) -> JsonDbResult<DateTime<Utc>> {
        TimeDelta::try_days(days)
            .and_then(|delta| date_time.checked_add_signed(delta))
            .ok_or_else(|| out_of_range(date_time, &format!("{} days", days)))
    }

    /// Adds calendar months. A day that does not exist in the target month
    /// is clamped to the month's last day (Jan 31 + 1 month is Feb 28 or 29).
    pub fn add_months(
        &self,
        date_time: &DateTime<Utc>,
        months: i32,
    ) -> JsonDbResult<DateTime<Utc>> {
        let shifted = if months >= 0 {
            date_time.checked_add_months(Months::new(months.unsigned_abs()))
        } else {
            date_time.checked_sub_months(Months::new(months.unsigned_abs()))
        };
        shifted.ok_or_else(|| out_of_range(date_time, &format!("{} months", months)))
    }

    pub fn add_years(&self, date_time: &DateTime<Utc>, years: i32) -> JsonDbResult<DateTime<Utc>> {
        match years.checked_mul(12) {
            Some(months) => self.add_months(date_time, months),
            None => Err(out_of_range(date_time, &format!("{} years", years))),
        }
    }

    /// Whole days from `start` to `end`, truncated toward zero; negative if `end` is earlier.
    pub fn days_between(&self, start: &DateTime<Utc>, end: &DateTime<Utc>) -> i64 {
        (*end - *start).num_days()
    }

    /// Calendar month difference between the two dates, ignoring days. Never negative.
    pub fn months_between(&self, start: &DateTime<Utc>, end: &DateTime<Utc>) -> i32 {
        let (start, end) = ordered(start, end);
        (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32
    }

    /// Completed years between the two dates. Never negative.
    pub fn years_between(&self, start: &DateTime<Utc>, end: &DateTime<Utc>) -> i32 {
        let (start, end) = ordered(start, end);
        let years = end.year() - start.year();
        if (start.month(), start.day()) > (end.month(), end.day()) {
            years - 1
        } else {
            years
        }
    }
}

fn ordered<'a>(
    a: &'a DateTime<Utc>,
    b: &'a DateTime<Utc>,
) -> (&'a DateTime<Utc>, &'a DateTime<Utc>) {
    if a > b {
        (b, a)
    } else {
        (a, b)
    }
}

fn out_of_range(date_time: &DateTime<Utc>, amount: &str) -> JsonDbError {
    log::error!("Adding {} to {} is out of range", amount, date_time);
    JsonDbError::new(
        &format!("Adding {} to {} is out of range", amount, date_time),
        ErrorKind::InvalidArgument,
    )
}
