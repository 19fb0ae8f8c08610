//! `jobmill-schedules` — the Schedule entity and its lifecycle manager.
//!
//! # Overview
//!
//! A Schedule binds an owner, a catalogued task, a cron expression, and a
//! validated input payload. [`manager::ScheduleLifecycleManager`] owns every
//! mutation: create, update, soft delete, and fire bookkeeping. It runs the
//! full validation pipeline (catalog lookup → cron → inputs → quota), keeps
//! `next_run_at` projected, and drives the external periodic-task mirror
//! through the [`mirror::ScheduleMirror`] seam.
//!
//! # Lifecycle
//!
//! `Enabled ⇄ Disabled` toggles freely via update. Soft delete tombstones
//! the row (`deleted_at`) and forces Disabled; the tombstone is absorbing —
//! no operation re-enables a deleted schedule, and rows are never
//! physically removed so execution history keeps its foreign references.

pub mod db;
pub mod error;
pub mod manager;
pub mod mirror;
pub mod query;
pub mod types;

pub use error::{Result, ScheduleError};
pub use manager::ScheduleLifecycleManager;
pub use mirror::{MirrorError, ScheduleMirror};
pub use query::{Order, ScheduleQuery};
pub use types::{MirrorState, NewSchedule, SavedSchedule, Schedule, SchedulePatch, ScheduleStatus};
