//! `jobmill-executions` — the durable audit trail of schedule firings.
//!
//! # Overview
//!
//! Every firing is bracketed by an [`types::Execution`] row:
//! [`tracker::ExecutionTracker::start`] before any task logic runs,
//! [`tracker::ExecutionTracker::finish`] exactly once afterwards with the
//! outcome, runtime, and structured logs.
//!
//! [`runner::TaskRunner`] is the wrapper the external dispatcher invokes
//! with a mirrored entry's positional args. It resolves the task's
//! [`handler::TaskHandler`], guarantees the finish call on every path, and
//! re-raises task failures so the dispatcher's own retry accounting
//! observes them. Execution rows are append-only and survive the soft
//! deletion of their schedule.

pub mod db;
pub mod error;
pub mod handler;
pub mod runner;
pub mod tracker;
pub mod types;

pub use error::{ExecutionError, Result};
pub use handler::{EchoTask, HandlerRegistry, TaskError, TaskHandler};
pub use runner::TaskRunner;
pub use tracker::ExecutionTracker;
pub use types::{Execution, ExecutionStatus};
