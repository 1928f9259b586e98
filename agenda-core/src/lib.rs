//! Core of the agenda appointment calendar.
//!
//! - [`Appointment`]: the entity, shared id per recurring series
//! - [`AppointmentManager`]: owns the collection, creation/query/deletion rules
//! - [`store`]: XML file persistence behind the [`AppointmentStore`] trait
//! - [`AgendaConfig`]: where the file lives and CLI defaults

pub mod appointment;
pub mod config;
pub mod error;
pub mod manager;
pub mod recurrence;
pub mod store;
pub mod ticks;
pub mod window;

pub use appointment::{Appointment, end_of_day};
pub use config::AgendaConfig;
pub use error::{AgendaError, AgendaResult, StoreError, StoreResult};
pub use manager::AppointmentManager;
pub use recurrence::Recurrence;
pub use store::{AppointmentStore, XmlFileStore};
pub use window::DayWindow;
