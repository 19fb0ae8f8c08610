use thiserror::Error;

/// Execution-layer errors.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("Execution not found: {id}")]
    NotFound { id: i64 },

    /// The task body (or handler resolution) failed. Always recorded in
    /// the execution's logs before being raised, so the dispatcher's
    /// retry/failure accounting and the audit trail agree.
    #[error("Task '{task}' failed: {message}")]
    TaskFailed { task: String, message: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Schedule error: {0}")]
    Schedule(#[from] jobmill_schedules::ScheduleError),
}

pub type Result<T> = std::result::Result<T, ExecutionError>;
