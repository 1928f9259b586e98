use agenda_core::{Appointment, AppointmentManager};
use clap::Args;
use owo_colors::OwoColorize;

use crate::render::{pluralize, render_numbered};

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Only appointments happening today
    #[arg(long, conflicts_with_all = ["days", "upcoming"])]
    pub today: bool,

    /// Only appointments within the next N days
    #[arg(long, conflicts_with = "upcoming")]
    pub days: Option<u32>,

    /// Only appointments within the configured number of upcoming days
    #[arg(long)]
    pub upcoming: bool,
}

/// Which appointments to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    All,
    Today,
    Days(u32),
}

impl ListArgs {
    pub fn scope(&self, upcoming_days: u32) -> Scope {
        if self.today {
            Scope::Today
        } else if let Some(days) = self.days {
            Scope::Days(days)
        } else if self.upcoming {
            Scope::Days(upcoming_days)
        } else {
            Scope::All
        }
    }
}

pub fn run(manager: &AppointmentManager, scope: Scope) {
    let lines = render_scope(manager, scope);

    if lines.is_empty() {
        println!("{}", empty_message(scope).dimmed());
        return;
    }

    for line in &lines {
        println!("  {}", line);
    }
    println!(
        "{}",
        format!("  {} {}", lines.len(), pluralize(lines.len())).dimmed()
    );
}

/// Numbered lines for the appointments in `scope`.
///
/// Numbers are 1-based collection positions, so they can be passed to
/// `agenda delete` regardless of the scope they were listed in.
pub fn render_scope(manager: &AppointmentManager, scope: Scope) -> Vec<String> {
    let selected: Vec<&Appointment> = match scope {
        Scope::All => manager.appointments().iter().collect(),
        Scope::Today => manager.ongoing(1),
        Scope::Days(days) => manager.ongoing(days),
    };

    selected
        .into_iter()
        .filter_map(|appointment| {
            let position = position_of(manager, appointment)?;
            Some(render_numbered(position + 1, appointment))
        })
        .collect()
}

fn position_of(manager: &AppointmentManager, appointment: &Appointment) -> Option<usize> {
    manager
        .appointments()
        .iter()
        .position(|a| std::ptr::eq(a, appointment))
}

fn empty_message(scope: Scope) -> String {
    match scope {
        Scope::All => "  No appointments found".to_string(),
        Scope::Today => "  No appointments today".to_string(),
        Scope::Days(1) => "  No appointments within the next day".to_string(),
        Scope::Days(n) => format!("  No appointments within the next {} days", n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agenda_core::XmlFileStore;
    use chrono::{Duration, Local};
    use tempfile::TempDir;

    fn manager(dir: &TempDir) -> AppointmentManager {
        AppointmentManager::new(XmlFileStore::new(dir.path().join("appointments.xml")))
    }

    #[test]
    fn scope_from_flags() {
        let all = ListArgs::default();
        assert_eq!(all.scope(7), Scope::All);

        let today = ListArgs { today: true, ..Default::default() };
        assert_eq!(today.scope(7), Scope::Today);

        let days = ListArgs { days: Some(3), ..Default::default() };
        assert_eq!(days.scope(7), Scope::Days(3));

        let upcoming = ListArgs { upcoming: true, ..Default::default() };
        assert_eq!(upcoming.scope(14), Scope::Days(14));
    }

    #[test]
    fn filtered_listing_keeps_collection_positions() {
        let dir = TempDir::new().unwrap();
        let mut m = manager(&dir);
        let now = Local::now().naive_local();

        m.create_single("Last year", now - Duration::days(400), now - Duration::days(400));
        m.create_single("Now", now, now);

        let lines = render_scope(&m, Scope::Today);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("Nr.   2"), "{}", lines[0]);
        assert!(lines[0].contains("Now"));

        assert_eq!(render_scope(&m, Scope::All).len(), 2);
    }

    #[test]
    fn empty_messages_name_the_scope() {
        assert_eq!(empty_message(Scope::Days(7)), "  No appointments within the next 7 days");
        assert_eq!(empty_message(Scope::Today), "  No appointments today");
    }
}
