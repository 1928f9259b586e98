//! Appointment persistence.
//!
//! The manager only talks to storage through [`AppointmentStore`]. The
//! file-backed implementation is [`XmlFileStore`].

mod xml;

pub use xml::{XmlFileStore, from_xml, to_xml};

use crate::appointment::Appointment;
use crate::error::StoreResult;

/// Durable storage for the full appointment collection.
pub trait AppointmentStore {
    /// Replace the stored collection with `appointments`.
    fn save(&self, appointments: &[Appointment]) -> StoreResult<()>;

    /// Read the stored collection.
    ///
    /// Returns an empty list when nothing has been stored yet. Any parse
    /// failure is an error for the whole load, never a partial list.
    fn load(&self) -> StoreResult<Vec<Appointment>>;
}
