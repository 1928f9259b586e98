mod commands;
mod input;
mod render;

use std::path::PathBuf;

use agenda_core::{AgendaConfig, AppointmentManager, XmlFileStore};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::delete::DeleteArgs;
use commands::list::ListArgs;
use commands::new::NewArgs;

#[derive(Parser)]
#[command(name = "agenda")]
#[command(about = "Keep track of single and recurring appointments in a local file")]
struct Cli {
    /// Appointment file to use instead of the configured one
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new appointment (prompts for anything not given)
    New(NewArgs),
    /// List appointments
    List(ListArgs),
    /// Delete appointments
    Delete(DeleteArgs),
    /// Menu-driven session (default when no command is given)
    Shell,
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = AgendaConfig::load().context("Failed to load config")?;

    let path = match cli.file {
        Some(path) => path,
        None => config.data_file_path()?,
    };
    tracing::debug!(path = %path.display(), "using appointment file");

    let mut manager = AppointmentManager::new(XmlFileStore::new(path));

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::New(args) => {
            commands::new::run(&mut manager, args)?;
            commands::save(&manager)
        }
        Commands::List(args) => {
            commands::list::run(&manager, args.scope(config.upcoming_days));
            Ok(())
        }
        Commands::Delete(args) => {
            if commands::delete::run(&mut manager, args)? {
                commands::save(&manager)?;
            }
            Ok(())
        }
        Commands::Shell => commands::shell::run(&mut manager, config.upcoming_days),
    }
}

/// Log to stderr, filtered by `AGENDA_LOG` (default: warnings and errors).
fn init_tracing() {
    let filter = EnvFilter::try_from_env("AGENDA_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
