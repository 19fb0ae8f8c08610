use std::collections::BTreeMap;

use thiserror::Error;

/// Schedule-layer errors. The first four variants are user-correctable
/// validation failures and are always recovered into a structured response;
/// `SyncFailure` is transient and retryable via `resync`.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("Invalid cron expression: {0}")]
    InvalidCron(String),

    /// Per-field schema violations, keyed by field name.
    #[error("Invalid inputs: {}", fmt_field_errors(.0))]
    InvalidInputs(BTreeMap<String, String>),

    #[error("Task is not schedulable: {name}")]
    TaskNotSchedulable { name: String },

    #[error("You can not have more than {limit} active jobs")]
    QuotaExceeded { limit: usize },

    #[error("Schedule not found: {id}")]
    NotFound { id: i64 },

    #[error("Permission denied: {reason}")]
    PermissionDenied { reason: String },

    /// The periodic-task mirror rejected or never received the upsert.
    /// The schedule row itself is durable; retry the sync step alone.
    #[error("Periodic-task sync failed: {0}")]
    SyncFailure(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ScheduleError {
    /// Short error code string for structured responses and logs.
    pub fn code(&self) -> &'static str {
        match self {
            ScheduleError::InvalidCron(_) => "INVALID_CRON",
            ScheduleError::InvalidInputs(_) => "INVALID_INPUTS",
            ScheduleError::TaskNotSchedulable { .. } => "TASK_NOT_SCHEDULABLE",
            ScheduleError::QuotaExceeded { .. } => "QUOTA_EXCEEDED",
            ScheduleError::NotFound { .. } => "NOT_FOUND",
            ScheduleError::PermissionDenied { .. } => "PERMISSION_DENIED",
            ScheduleError::SyncFailure(_) => "SYNC_FAILURE",
            ScheduleError::Database(_) => "DATABASE_ERROR",
            ScheduleError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }
}

fn fmt_field_errors(errors: &BTreeMap<String, String>) -> String {
    errors
        .iter()
        .map(|(field, msg)| format!("{field}: {msg}"))
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
