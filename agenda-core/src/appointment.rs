//! The appointment entity.

use std::fmt;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use uuid::Uuid;

use crate::ticks;

/// A single appointment.
///
/// Every occurrence produced by one recurring creation shares the same `id`;
/// a single appointment gets an id of its own. The id never changes after
/// construction, while title and times can be edited in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appointment {
    id: String,
    title: String,
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl Appointment {
    /// Times are truncated to tick precision so they round-trip through the file.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        Appointment {
            id: id.into(),
            title: title.into(),
            start: ticks::truncate(start),
            end: ticks::truncate(end),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_start(&mut self, start: NaiveDateTime) {
        self.start = ticks::truncate(start);
    }

    pub fn set_end(&mut self, end: NaiveDateTime) {
        self.end = ticks::truncate(end);
    }

    /// Whether this appointment starts on the given local calendar day.
    pub fn starts_on(&self, date: NaiveDate) -> bool {
        self.start.date() == date
    }

    /// Whether `other` belongs to the same series and starts no earlier than this one.
    pub fn is_same_or_later_in_series(&self, other: &Appointment) -> bool {
        other.id == self.id && other.start >= self.start
    }
}

impl fmt::Display for Appointment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Generate a new appointment id.
///
/// Combines the current local time in ticks with a random UUID, so two calls
/// in the same instant still produce different ids.
pub fn generate_id() -> String {
    let now = Local::now().naive_local();
    let ticks = ticks::to_ticks(&now).unwrap_or_default();
    format!("{}-{}", ticks, Uuid::new_v4())
}

/// Last representable instant of a day (23:59:59.999), used as the end of all-day appointments.
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN))
}
