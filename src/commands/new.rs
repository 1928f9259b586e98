use agenda_core::{AppointmentManager, Recurrence, end_of_day};
use anyhow::Result;
use chrono::{Duration, NaiveDateTime};
use clap::Args;
use dialoguer::{Input, Select};
use owo_colors::OwoColorize;

use crate::input::{self, When};
use crate::render::pluralize;

#[derive(Args, Debug, Default)]
pub struct NewArgs {
    /// Title of the appointment
    pub title: Option<String>,

    /// Start date/time (e.g. "2025-03-20 15:00", "20.03.2025", "tomorrow 3pm")
    #[arg(short, long)]
    pub start: Option<String>,

    /// End date/time
    #[arg(short, long, conflicts_with = "duration")]
    pub end: Option<String>,

    /// Duration instead of an end (e.g. "30m", "2h")
    #[arg(short, long)]
    pub duration: Option<String>,

    /// Last the whole start day
    #[arg(long, conflicts_with_all = ["end", "duration"])]
    pub all_day: bool,

    /// Repeat weekly or yearly
    #[arg(short, long)]
    pub repeat: Option<Recurrence>,

    /// Number of occurrences for a repeating appointment
    #[arg(short, long, requires = "repeat")]
    pub count: Option<usize>,
}

/// Create one appointment or a series. Prompts for whatever was not given.
pub fn run(manager: &mut AppointmentManager, args: NewArgs) -> Result<()> {
    let interactive = args.title.is_none() || args.start.is_none();

    // --- Title ---
    let title = match args.title {
        Some(t) => t,
        None => Input::<String>::new()
            .with_prompt("  Title")
            .interact_text()?,
    };

    // --- Start ---
    let start = match &args.start {
        Some(s) => input::parse_when(s)?,
        None => input::prompt_with_retry("  When?", input::parse_when)?,
    };
    let all_day = args.all_day || matches!(start, When::Date(_));
    let start = start.as_start();

    // --- End ---
    let end = if all_day {
        end_of_day(start.date())
    } else if let Some(end) = &args.end {
        input::parse_end(end, start)?
    } else if let Some(duration) = &args.duration {
        input::apply_duration(start, duration)?
    } else if interactive {
        prompt_end(start)?
    } else {
        default_end(start)
    };
    input::validate_end(start, end)?;

    // --- Recurrence ---
    let recurrence = match args.repeat {
        Some(r) => Some(r),
        None if interactive => prompt_recurrence()?,
        None => None,
    };

    match recurrence {
        None => {
            let appointment = manager.create_single(title, start, end);
            println!("{}", format!("  Created: {}", appointment).green());
        }
        Some(recurrence) => {
            let count = match args.count {
                Some(c) => c,
                None if interactive => prompt_count()?,
                None => anyhow::bail!("--count is required with --repeat"),
            };

            let created = manager.create_recurring(&title, start, end, recurrence, count)?;
            println!(
                "{}",
                format!(
                    "  Created: {} ({} {} {})",
                    title,
                    created.len(),
                    recurrence,
                    pluralize(created.len())
                )
                .green()
            );
        }
    }

    Ok(())
}

/// Default end time: one hour after the start.
fn default_end(start: NaiveDateTime) -> NaiveDateTime {
    start + Duration::hours(1)
}

fn prompt_end(start: NaiveDateTime) -> Result<NaiveDateTime> {
    loop {
        let input: String = Input::new()
            .with_prompt("  Until? (duration or end, default 1 hour)")
            .default(String::new())
            .show_default(false)
            .interact_text()?;
        if input.is_empty() {
            return Ok(default_end(start));
        }

        match input::parse_end(&input, start).and_then(|end| {
            input::validate_end(start, end)?;
            Ok(end)
        }) {
            Ok(end) => return Ok(end),
            Err(e) => eprintln!("  {}", e.to_string().red()),
        }
    }
}

fn prompt_recurrence() -> Result<Option<Recurrence>> {
    let selection = Select::new()
        .with_prompt("  Repeat")
        .items(&["Once", "Weekly", "Yearly"])
        .default(0)
        .interact()?;

    Ok(match selection {
        1 => Some(Recurrence::Weekly),
        2 => Some(Recurrence::Yearly),
        _ => None,
    })
}

fn prompt_count() -> Result<usize> {
    let count = Input::<usize>::new()
        .with_prompt("  How many occurrences?")
        .validate_with(|n: &usize| {
            if *n >= 1 {
                Ok(())
            } else {
                Err("Enter a number of at least 1")
            }
        })
        .interact_text()?;
    Ok(count)
}
