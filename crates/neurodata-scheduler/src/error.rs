use thiserror::Error;

/// Errors that can occur within the scheduler subsystem.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Underlying SQLite / rusqlite error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A table entry is unusable (e.g. zero interval).
    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    /// Two table entries share a name.
    #[error("Duplicate job name: {name}")]
    DuplicateJob { name: String },

    /// No job with the given name exists in the table.
    #[error("Job not found: {name}")]
    JobNotFound { name: String },

    /// A persisted timestamp could not be parsed.
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
