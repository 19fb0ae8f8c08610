use thiserror::Error;

use crate::types::Schedule;

/// Failure while talking to the periodic-task mirror. Always transient
/// from the schedule layer's point of view: the caller retries, the
/// schedule row is already durable.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct MirrorError(pub String);

/// Seam between the lifecycle manager and the external periodic-task
/// store. `jobmill-periodic` provides the production implementation; tests
/// substitute doubles.
///
/// The external store is treated as a derived view: both operations are
/// recomputed from the schedule's current fields, never patched
/// incrementally, so calling them twice with an unchanged schedule is
/// observably idempotent.
pub trait ScheduleMirror: Send + Sync {
    /// Idempotent upsert of the mirrored entry. Returns the external
    /// periodic-task id — on first sync a fresh allocation, afterwards
    /// always the schedule's existing one.
    fn upsert(&self, schedule: &Schedule) -> std::result::Result<i64, MirrorError>;

    /// Disable the mirrored entry and clear its arguments. Used on soft
    /// delete; the entry itself is kept for operator traceability.
    fn disable(&self, periodic_task_id: i64) -> std::result::Result<(), MirrorError>;
}
