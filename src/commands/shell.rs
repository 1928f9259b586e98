use agenda_core::AppointmentManager;
use anyhow::Result;
use dialoguer::{Confirm, Select};
use owo_colors::OwoColorize;

use crate::commands::list::{self, Scope};
use crate::commands::{delete, new};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    New,
    Today,
    Upcoming,
    All,
    DeleteOne,
    DeleteDay,
    DeleteAll,
    Save,
    Quit,
}

impl Action {
    const ALL: [Action; 9] = [
        Action::New,
        Action::Today,
        Action::Upcoming,
        Action::All,
        Action::DeleteOne,
        Action::DeleteDay,
        Action::DeleteAll,
        Action::Save,
        Action::Quit,
    ];

    fn label(self, upcoming_days: u32) -> String {
        match self {
            Action::New => "New appointment".to_string(),
            Action::Today => "Today".to_string(),
            Action::Upcoming => format!("Next {} days", upcoming_days),
            Action::All => "All appointments".to_string(),
            Action::DeleteOne => "Delete an appointment".to_string(),
            Action::DeleteDay => "Delete all appointments of a day".to_string(),
            Action::DeleteAll => "Delete all appointments".to_string(),
            Action::Save => "Save".to_string(),
            Action::Quit => "Quit".to_string(),
        }
    }
}

/// Menu-driven session. Changes are kept in memory until saved.
pub fn run(manager: &mut AppointmentManager, upcoming_days: u32) -> Result<()> {
    let labels: Vec<String> = Action::ALL.iter().map(|a| a.label(upcoming_days)).collect();
    let mut dirty = false;

    loop {
        println!();
        let selection = Select::new()
            .with_prompt("What do you want to do?")
            .items(&labels)
            .default(0)
            .interact()?;
        let action = Action::ALL[selection];

        if action == Action::Quit {
            if dirty && confirm_save()? {
                super::save(manager)?;
            }
            return Ok(());
        }

        match perform(manager, action, upcoming_days) {
            Ok(changed) => {
                dirty |= changed;
                if action == Action::Save {
                    dirty = false;
                }
            }
            Err(e) => eprintln!("  {}", e.to_string().red()),
        }
    }
}

/// Run one menu action. Returns whether the collection changed.
fn perform(manager: &mut AppointmentManager, action: Action, upcoming_days: u32) -> Result<bool> {
    match action {
        Action::New => {
            new::run(manager, new::NewArgs::default())?;
            Ok(true)
        }
        Action::Today => {
            list::run(manager, Scope::Today);
            Ok(false)
        }
        Action::Upcoming => {
            list::run(manager, Scope::Days(upcoming_days));
            Ok(false)
        }
        Action::All => {
            list::run(manager, Scope::All);
            Ok(false)
        }
        Action::DeleteOne => delete::prompt_position(manager),
        Action::DeleteDay => delete::prompt_date(manager),
        Action::DeleteAll => delete::all(manager, false),
        Action::Save => {
            super::save(manager)?;
            Ok(false)
        }
        Action::Quit => Ok(false),
    }
}

fn confirm_save() -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt("  You have unsaved changes. Save before quitting?")
        .default(true)
        .interact()?)
}
