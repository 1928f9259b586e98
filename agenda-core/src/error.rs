//! Error types for agenda operations.

use chrono::NaiveDateTime;
use thiserror::Error;

/// Errors returned by the appointment manager and its collaborators.
#[derive(Error, Debug)]
pub enum AgendaError {
    #[error("No appointment at position {index} (collection holds {len})")]
    InvalidPosition { index: usize, len: usize },

    #[error("Recurrence count must be at least 1, got {0}")]
    InvalidRecurrenceCount(usize),

    #[error("Unknown recurrence kind '{0}' (expected weekly or yearly)")]
    UnknownRecurrence(String),

    #[error("Date out of range: {0}")]
    DateOutOfRange(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// Errors raised while reading or writing the appointment file.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("Malformed appointment record: {0}")]
    MalformedRecord(String),

    #[error("Invalid tick value {0}")]
    InvalidTicks(i64),

    #[error("Timestamp {0} cannot be stored as ticks")]
    TimestampOutOfRange(NaiveDateTime),

    #[error("Character {0:?} cannot be stored in the appointment file")]
    InvalidCharacter(char),
}

/// Result type alias for agenda operations.
pub type AgendaResult<T> = Result<T, AgendaError>;

/// Result type alias for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;
