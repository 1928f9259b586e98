//! Day-aligned time window for selecting ongoing appointments.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::appointment::Appointment;

/// The half-open window `[start, end)` starting at midnight of a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DayWindow {
    /// Window covering `days` whole days beginning at midnight of `first_day`.
    pub fn starting(first_day: NaiveDate, days: u32) -> Self {
        let start = first_day.and_time(chrono::NaiveTime::MIN);
        let end = start
            .checked_add_signed(Duration::days(i64::from(days)))
            .unwrap_or(NaiveDateTime::MAX);

        DayWindow { start, end }
    }

    /// Whether the appointment should be listed for this window.
    ///
    /// The appointment end is exclusive at the window end unless the
    /// appointment spans the whole window.
    pub fn overlaps(&self, appointment: &Appointment) -> bool {
        let (s, e) = (appointment.start(), appointment.end());
        let (ws, we) = (self.start, self.end);

        (s >= ws && e < we)
            || (s >= ws && s < we)
            || (e >= ws && e < we)
            || (s <= ws && e > we)
    }
}
