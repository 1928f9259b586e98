pub mod delete;
pub mod list;
pub mod new;
pub mod shell;

use agenda_core::AppointmentManager;
use anyhow::Result;
use owo_colors::OwoColorize;

/// Persist the manager's collection, turning a failed save into an error.
pub fn save(manager: &AppointmentManager) -> Result<()> {
    if !manager.save() {
        anyhow::bail!(
            "Could not save appointments to {}",
            manager.store().path().display()
        );
    }

    println!("{}", "  Saved.".dimmed());
    Ok(())
}
