use agenda_core::{AgendaError, AppointmentManager};
use anyhow::Result;
use chrono::NaiveDate;
use clap::{ArgGroup, Args};
use dialoguer::{Confirm, Input, Select};
use owo_colors::OwoColorize;

use crate::commands::list::{self, Scope};
use crate::input;
use crate::render::{Render, pluralize};

#[derive(Args, Debug, Default)]
#[command(group(ArgGroup::new("target").args(["position", "date", "all"])))]
pub struct DeleteArgs {
    /// Position of the appointment as shown by `agenda list` (starting at 1)
    pub position: Option<usize>,

    /// Also delete all later occurrences of the appointment's series
    #[arg(long, requires = "position")]
    pub series: bool,

    /// Delete every appointment starting on this day
    #[arg(long)]
    pub date: Option<String>,

    /// Delete all appointments
    #[arg(long)]
    pub all: bool,

    /// Do not ask for confirmation
    #[arg(short, long)]
    pub yes: bool,
}

/// Delete appointments. Returns whether anything was removed.
pub fn run(manager: &mut AppointmentManager, args: DeleteArgs) -> Result<bool> {
    if let Some(position) = args.position {
        let series = if args.series { Some(true) } else { None };
        return by_position(manager, position, series, args.yes);
    }

    if let Some(date) = &args.date {
        return by_date(manager, input::parse_date(date)?, args.yes);
    }

    if args.all {
        return all(manager, args.yes);
    }

    // Nothing given: ask what to delete
    let selection = Select::new()
        .with_prompt("  Delete")
        .items(&["One appointment", "All appointments of a day", "All appointments"])
        .default(0)
        .interact()?;

    match selection {
        0 => prompt_position(manager),
        1 => prompt_date(manager),
        _ => all(manager, false),
    }
}

/// List everything, ask for a position and delete it.
pub fn prompt_position(manager: &mut AppointmentManager) -> Result<bool> {
    if manager.is_empty() {
        println!("{}", "  No appointments found".dimmed());
        return Ok(false);
    }

    list::run(manager, Scope::All);
    let position = Input::<usize>::new()
        .with_prompt("  Number")
        .interact_text()?;

    by_position(manager, position, None, false)
}

/// Ask for a day and delete everything starting on it.
pub fn prompt_date(manager: &mut AppointmentManager) -> Result<bool> {
    let date = input::prompt_with_retry("  Day", input::parse_date)?;
    by_date(manager, date, false)
}

/// Delete the appointment at a 1-based `position`.
///
/// When the appointment has later occurrences, `series` decides whether they
/// go too; `None` asks the user (or keeps them when `yes` is set).
pub fn by_position(
    manager: &mut AppointmentManager,
    position: usize,
    series: Option<bool>,
    yes: bool,
) -> Result<bool> {
    let index = to_index(manager, position)?;
    let occurrences = manager.occurrences_of_series(index)?.len();

    if occurrences > 1 {
        let with_series = match series {
            Some(s) => s,
            None if yes => false,
            None => confirm(&format!(
                "This appointment has {} later {}. Delete them too?",
                occurrences - 1,
                if occurrences == 2 { "occurrence" } else { "occurrences" }
            ))?,
        };

        if with_series {
            let removed = manager.delete_series_from(index)?;
            println!(
                "{}",
                format!("  Deleted {} {}", removed.len(), pluralize(removed.len())).red()
            );
            return Ok(true);
        }
    } else if !yes {
        let title = manager.appointments()[index].render();
        if !confirm(&format!("Delete {}?", title))? {
            println!("{}", "  Cancelled".dimmed());
            return Ok(false);
        }
    }

    let removed = manager.delete_at(index)?;
    println!("{}", format!("  Deleted: {}", removed).red());
    Ok(true)
}

/// Delete every appointment starting on `date`.
pub fn by_date(manager: &mut AppointmentManager, date: NaiveDate, yes: bool) -> Result<bool> {
    if !manager.has_appointments_on(date) {
        println!("{}", format!("  No appointments found on {}", date).dimmed());
        return Ok(false);
    }

    if !yes && !confirm(&format!("Delete all appointments starting on {}?", date))? {
        println!("{}", "  Cancelled".dimmed());
        return Ok(false);
    }

    let removed = manager.delete_on_date(date);
    println!("{}", format!("  Deleted {} {}", removed, pluralize(removed)).red());
    Ok(true)
}

/// Delete everything.
pub fn all(manager: &mut AppointmentManager, yes: bool) -> Result<bool> {
    if manager.is_empty() {
        println!("{}", "  No appointments found".dimmed());
        return Ok(false);
    }

    if !yes && !confirm("Really delete ALL appointments?")? {
        println!("{}", "  Cancelled".dimmed());
        return Ok(false);
    }

    let removed = manager.delete_all();
    println!("{}", format!("  Deleted {} {}", removed, pluralize(removed)).red());
    Ok(true)
}

/// Convert a 1-based listing position into a collection index.
fn to_index(manager: &AppointmentManager, position: usize) -> Result<usize> {
    let index = position
        .checked_sub(1)
        .ok_or_else(|| anyhow::anyhow!("Positions start at 1"))?;

    // Validate through the manager so the error carries the stored count
    match manager.occurrences_of_series(index) {
        Ok(_) => Ok(index),
        Err(AgendaError::InvalidPosition { len, .. }) => {
            anyhow::bail!("Appointment {} does not exist ({} stored)", position, len)
        }
        Err(e) => Err(e.into()),
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(format!("  {}", prompt))
        .default(false)
        .interact()?)
}
