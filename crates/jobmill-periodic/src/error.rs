use thiserror::Error;

/// Failures while reading or writing the periodic-task store.
#[derive(Debug, Error)]
pub enum PeriodicError {
    #[error("Periodic task not found: {id}")]
    EntryNotFound { id: i64 },

    /// The schedule's stored cron expression no longer splits into the 5
    /// crontab columns. Validation upstream makes this unreachable in
    /// normal operation.
    #[error("Cannot derive crontab columns from '{0}'")]
    InvalidCrontab(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PeriodicError>;
