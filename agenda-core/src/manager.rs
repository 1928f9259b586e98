//! In-memory appointment collection and the rules for changing it.

use chrono::{Local, NaiveDate, NaiveDateTime};

use crate::appointment::{self, Appointment};
use crate::error::{AgendaError, AgendaResult};
use crate::recurrence::{self, Recurrence};
use crate::store::{AppointmentStore, XmlFileStore};
use crate::window::DayWindow;

/// Owns the appointment collection and mediates access to its store.
///
/// The collection keeps insertion order: loaded appointments first, then
/// appended ones. Nothing is written back until [`save`](Self::save) is called.
pub struct AppointmentManager<S: AppointmentStore = XmlFileStore> {
    store: S,
    appointments: Vec<Appointment>,
}

impl<S: AppointmentStore> AppointmentManager<S> {
    /// Create a manager and load whatever the store currently holds.
    pub fn new(store: S) -> Self {
        let mut manager = AppointmentManager {
            store,
            appointments: Vec::new(),
        };
        manager.load();
        manager
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn get(&self, index: usize) -> Option<&Appointment> {
        self.appointments.get(index)
    }

    pub fn len(&self) -> usize {
        self.appointments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.appointments.is_empty()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Append a single appointment with a fresh id.
    pub fn create_single(
        &mut self,
        title: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> &Appointment {
        let appointment = Appointment::new(appointment::generate_id(), title, start, end);
        tracing::info!(id = appointment.id(), title = appointment.title(), "created appointment");

        let index = self.appointments.len();
        self.appointments.push(appointment);
        &self.appointments[index]
    }

    /// Append `count` occurrences of a series sharing one fresh id.
    ///
    /// Returns the appended occurrences. On error nothing is appended.
    pub fn create_recurring(
        &mut self,
        title: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
        recurrence: Recurrence,
        count: usize,
    ) -> AgendaResult<&[Appointment]> {
        let id = appointment::generate_id();
        let occurrences = recurrence::expand(&id, title, start, end, recurrence, count)?;
        tracing::info!(%id, title, %recurrence, count, "created recurring appointments");

        let first = self.appointments.len();
        self.appointments.extend(occurrences);
        Ok(&self.appointments[first..])
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The appointment at `index` and every later occurrence of its series.
    ///
    /// Earlier occurrences of the same series are not included.
    pub fn occurrences_of_series(&self, index: usize) -> AgendaResult<Vec<&Appointment>> {
        let anchor = self.resolve(index)?;

        Ok(self
            .appointments
            .iter()
            .filter(|a| anchor.is_same_or_later_in_series(a))
            .collect())
    }

    /// Appointments overlapping the next `range_days` days, starting at local midnight today.
    pub fn ongoing(&self, range_days: u32) -> Vec<&Appointment> {
        self.ongoing_from(Local::now().date_naive(), range_days)
    }

    /// Appointments overlapping the `range_days` days that begin at midnight of `today`.
    pub fn ongoing_from(&self, today: NaiveDate, range_days: u32) -> Vec<&Appointment> {
        let window = DayWindow::starting(today, range_days);
        self.appointments.iter().filter(|a| window.overlaps(a)).collect()
    }

    /// Whether any appointment starts on `date`.
    pub fn has_appointments_on(&self, date: NaiveDate) -> bool {
        self.appointments.iter().any(|a| a.starts_on(date))
    }

    // =========================================================================
    // Deletion
    // =========================================================================

    /// Remove and return the appointment at `index`.
    pub fn delete_at(&mut self, index: usize) -> AgendaResult<Appointment> {
        self.resolve(index)?;

        let removed = self.appointments.remove(index);
        tracing::info!(id = removed.id(), index, "deleted appointment");
        Ok(removed)
    }

    /// Remove the appointment at `index` and every later occurrence of its series.
    ///
    /// Removes exactly what [`occurrences_of_series`](Self::occurrences_of_series)
    /// returns for the same index.
    pub fn delete_series_from(&mut self, index: usize) -> AgendaResult<Vec<Appointment>> {
        let anchor = self.resolve(index)?.clone();

        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.appointments)
            .into_iter()
            .partition(|a| anchor.is_same_or_later_in_series(a));
        self.appointments = kept;

        tracing::info!(id = anchor.id(), count = removed.len(), "deleted series occurrences");
        Ok(removed)
    }

    /// Remove every appointment starting on `date`. Returns how many were removed.
    pub fn delete_on_date(&mut self, date: NaiveDate) -> usize {
        let before = self.appointments.len();
        self.appointments.retain(|a| !a.starts_on(date));

        let removed = before - self.appointments.len();
        tracing::info!(%date, count = removed, "deleted appointments on date");
        removed
    }

    /// Remove every appointment. Returns how many were removed.
    pub fn delete_all(&mut self) -> usize {
        let removed = self.appointments.len();
        self.appointments.clear();

        tracing::info!(count = removed, "deleted all appointments");
        removed
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Write the full collection to the store. Returns whether it succeeded.
    pub fn save(&self) -> bool {
        match self.store.save(&self.appointments) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, "failed to save appointments");
                false
            }
        }
    }

    /// Replace the collection with the store contents, or empty it if they cannot be read.
    pub fn load(&mut self) {
        self.appointments = self.store.load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not load appointments, starting empty");
            Vec::new()
        });
    }

    fn resolve(&self, index: usize) -> AgendaResult<&Appointment> {
        self.appointments.get(index).ok_or(AgendaError::InvalidPosition {
            index,
            len: self.appointments.len(),
        })
    }
}
