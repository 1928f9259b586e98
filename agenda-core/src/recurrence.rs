//! Recurrence expansion for appointment series.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, Months, NaiveDateTime};

use crate::appointment::Appointment;
use crate::error::{AgendaError, AgendaResult};

/// How often a recurring appointment repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recurrence {
    /// Every 7 days.
    Weekly,
    /// Same month and day every calendar year.
    Yearly,
}

impl Recurrence {
    /// Shift `dt` forward by one period.
    ///
    /// A yearly step from Feb 29 is clamped to Feb 28.
    pub fn advance(self, dt: NaiveDateTime) -> Option<NaiveDateTime> {
        match self {
            Recurrence::Weekly => dt.checked_add_signed(Duration::weeks(1)),
            Recurrence::Yearly => dt.checked_add_months(Months::new(12)),
        }
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Recurrence::Weekly => write!(f, "weekly"),
            Recurrence::Yearly => write!(f, "yearly"),
        }
    }
}

impl FromStr for Recurrence {
    type Err = AgendaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekly" | "week" | "w" => Ok(Recurrence::Weekly),
            "yearly" | "year" | "y" | "annually" => Ok(Recurrence::Yearly),
            other => Err(AgendaError::UnknownRecurrence(other.to_string())),
        }
    }
}

/// Expand a series into `count` occurrences sharing `id`, in ascending time order.
///
/// Either every occurrence is produced or an error is returned.
pub fn expand(
    id: &str,
    title: &str,
    start: NaiveDateTime,
    end: NaiveDateTime,
    recurrence: Recurrence,
    count: usize,
) -> AgendaResult<Vec<Appointment>> {
    if count == 0 {
        return Err(AgendaError::InvalidRecurrenceCount(count));
    }

    let mut occurrences = Vec::with_capacity(count.min(1024));
    let (mut start, mut end) = (start, end);

    // Each occurrence steps from the previous one, so a clamped date stays clamped
    for n in 0..count {
        if n > 0 {
            (start, end) = recurrence
                .advance(start)
                .zip(recurrence.advance(end))
                .ok_or_else(|| {
                    AgendaError::DateOutOfRange(format!(
                        "occurrence {} of {} series after {}",
                        n + 1,
                        recurrence,
                        start
                    ))
                })?;
        }
        occurrences.push(Appointment::new(id, title, start, end));
    }

    Ok(occurrences)
}
