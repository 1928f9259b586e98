//! Terminal rendering for appointments.

use agenda_core::{Appointment, end_of_day};
use chrono::{NaiveDateTime, NaiveTime};
use owo_colors::OwoColorize;

/// Extension trait for colored terminal rendering.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for Appointment {
    fn render(&self) -> String {
        format!(
            "{}  {}",
            self.title().bold(),
            format_range(self.start(), self.end()).dimmed()
        )
    }
}

/// One numbered listing line, e.g. "Nr. 3  Standup  Tue 2024-01-02 09:00 - 09:30".
pub fn render_numbered(number: usize, appointment: &Appointment) -> String {
    format!("{} {}", format!("Nr. {:>3}", number).cyan(), appointment.render())
}

/// Human-readable span of an appointment.
pub fn format_range(start: NaiveDateTime, end: NaiveDateTime) -> String {
    let same_day = start.date() == end.date();

    if same_day && start.time() == NaiveTime::MIN && end == end_of_day(start.date()) {
        return format!("{} all-day", start.format("%a %Y-%m-%d"));
    }

    if same_day {
        format!("{} - {}", start.format("%a %Y-%m-%d %H:%M"), end.format("%H:%M"))
    } else {
        format!(
            "{} - {}",
            start.format("%a %Y-%m-%d %H:%M"),
            end.format("%a %Y-%m-%d %H:%M")
        )
    }
}

/// Simple pluralization helper
pub fn pluralize(count: usize) -> &'static str {
    if count == 1 { "appointment" } else { "appointments" }
}
