//! `jobmill-periodic` — the external periodic-task store and its
//! synchronizer.
//!
//! # Overview
//!
//! The external dispatcher does not read jobmill's `schedules` table; it
//! reads periodic-task entries: a crontab definition (the 5 cron fields
//! plus a time zone, shared across schedules with identical expressions)
//! and an entry binding that crontab to a task handler with positional
//! arguments `[schedule_id, task_name, inputs]`.
//!
//! [`sync::PeriodicTaskSynchronizer`] keeps those entries consistent with
//! the schedule rows. It treats the store as a derived view — every upsert
//! recomputes the full entry from the schedule's current fields, so the
//! operation is idempotent and safe to repeat after partial failures.

pub mod db;
pub mod error;
pub mod store;
pub mod sync;
pub mod types;

pub use error::{PeriodicError, Result};
pub use store::PeriodicTaskStore;
pub use sync::PeriodicTaskSynchronizer;
pub use types::{entry_name, CrontabDef, PeriodicTaskEntry};
