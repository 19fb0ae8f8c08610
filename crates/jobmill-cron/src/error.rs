use thiserror::Error;

/// Errors raised while parsing a cron expression or zone string.
///
/// Every variant renders to a message fit for returning verbatim to the
/// user who submitted the expression.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CronError {
    #[error("Cron expression is required")]
    Empty,

    #[error("Cron must have exactly 5 fields: minute hour day month dow (found {found})")]
    FieldCount { found: usize },

    /// A single field failed to parse; `field` names which one.
    #[error("Invalid {field} field: {reason}")]
    Field { field: &'static str, reason: String },

    #[error("Unsupported time zone '{0}': expected UTC or a fixed +HH:MM / -HH:MM offset")]
    Zone(String),
}

pub type Result<T> = std::result::Result<T, CronError>;
