//! Global agenda configuration.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{AgendaError, AgendaResult};

const DEFAULT_UPCOMING_DAYS: u32 = 7;
const DATA_FILE_NAME: &str = "appointments.xml";

fn default_upcoming_days() -> u32 {
    DEFAULT_UPCOMING_DAYS
}

/// Configuration at ~/.config/agenda/config.toml
///
/// Every key can also be set through an `AGENDA_` prefixed environment
/// variable, e.g. `AGENDA_DATA_FILE`.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AgendaConfig {
    /// Appointment file. Defaults to `<data dir>/agenda/appointments.xml`.
    #[serde(default)]
    pub data_file: Option<PathBuf>,

    /// Number of days shown by `agenda list --upcoming`.
    #[serde(default = "default_upcoming_days")]
    pub upcoming_days: u32,
}

impl Default for AgendaConfig {
    fn default() -> Self {
        AgendaConfig {
            data_file: None,
            upcoming_days: DEFAULT_UPCOMING_DAYS,
        }
    }
}

impl AgendaConfig {
    pub fn config_path() -> AgendaResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AgendaError::Config("Could not determine config directory".into()))?
            .join("agenda");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the config, writing a commented default file on first run.
    pub fn load() -> AgendaResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load the config from `path` (optional) with the environment overlay.
    pub fn load_from(path: &Path) -> AgendaResult<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("AGENDA"))
            .build()
            .map_err(|e| AgendaError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| AgendaError::Config(e.to_string()))
    }

    /// Resolved appointment file path, with `~` expanded.
    pub fn data_file_path(&self) -> AgendaResult<PathBuf> {
        match &self.data_file {
            Some(path) => Ok(expand_tilde(path)),
            None => {
                let data_dir = dirs::data_dir().ok_or_else(|| {
                    AgendaError::Config("Could not determine data directory".into())
                })?;
                Ok(data_dir.join("agenda").join(DATA_FILE_NAME))
            }
        }
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> AgendaResult<()> {
        let contents = format!(
            "\
# agenda configuration

# Where appointments are stored:
# data_file = \"~/.local/share/agenda/{}\"

# Days shown by `agenda list --upcoming`:
# upcoming_days = {}
",
            DATA_FILE_NAME, DEFAULT_UPCOMING_DAYS
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AgendaError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| AgendaError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

fn expand_tilde(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}
