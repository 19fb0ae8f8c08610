//! `jobmill-catalog` — the read-only catalog of schedulable tasks.
//!
//! A [`TaskDefinition`] declares a task's name, its input schema, and
//! whether owners may schedule it. Definitions are seeded into SQLite once
//! (idempotently) and loaded into an in-memory [`TaskCatalog`] at process
//! start; request traffic never mutates them.
//!
//! [`validate::validate_inputs`] checks an arbitrary JSON payload against a
//! task's declared schema and returns a per-field error map.

pub mod db;
pub mod error;
pub mod registry;
pub mod types;
pub mod validate;

pub use error::{CatalogError, Result};
pub use registry::TaskCatalog;
pub use types::{FieldSpec, FieldType, TaskDefinition};
pub use validate::validate_inputs;
