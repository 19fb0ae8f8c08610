use thiserror::Error;

/// Catalog-layer errors. Absence of a task name is a normal, expected
/// condition for callers (owners can reference any string); it is a
/// distinct variant rather than a database fault.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Unknown task: {0}")]
    UnknownTask(String),

    #[error("Stored schema for task '{name}' is not valid JSON: {reason}")]
    InvalidSchema { name: String, reason: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
