use std::sync::Arc;

use chrono::Utc;
use jobmill_schedules::ScheduleLifecycleManager;
use serde_json::{json, Value};
use tracing::{error, info, instrument};

use crate::error::{ExecutionError, Result};
use crate::handler::HandlerRegistry;
use crate::tracker::ExecutionTracker;
use crate::types::{Execution, ExecutionStatus};

/// The task-execution wrapper the external dispatcher invokes with a
/// mirrored entry's positional args `(schedule_id, task_name, inputs)`.
///
/// Invariant: `start` runs before any task logic and `finish` runs exactly
/// once regardless of outcome. A failure is recorded with an error payload
/// first and then re-raised, so the dispatcher's retry/failure accounting
/// observes it.
pub struct TaskRunner {
    tracker: Arc<ExecutionTracker>,
    handlers: HandlerRegistry,
    schedules: Arc<ScheduleLifecycleManager>,
}

impl TaskRunner {
    pub fn new(
        tracker: Arc<ExecutionTracker>,
        handlers: HandlerRegistry,
        schedules: Arc<ScheduleLifecycleManager>,
    ) -> Self {
        Self {
            tracker,
            handlers,
            schedules,
        }
    }

    /// Run one firing end to end. Returns the finalised execution record
    /// on success; on failure the error carries what the task raised.
    #[instrument(skip(self, inputs), fields(schedule_id, task = task_name))]
    pub async fn run(&self, schedule_id: i64, task_name: &str, inputs: &Value) -> Result<Execution> {
        let started = Utc::now();
        let execution = self.tracker.start(schedule_id, task_name)?;

        let outcome = match self.handlers.get(task_name) {
            Some(handler) => handler.run(inputs).await.map_err(|e| e.to_string()),
            None => Err(format!("no handler registered for task '{task_name}'")),
        };

        match outcome {
            Ok(logs) => {
                self.tracker.finish(
                    execution.id,
                    ExecutionStatus::Success,
                    Some(&logs),
                    Some(started),
                )?;
                self.schedules.record_fired(schedule_id, started)?;
                info!(execution_id = execution.id, "task succeeded");
                self.tracker
                    .get(execution.id)?
                    .ok_or(ExecutionError::NotFound { id: execution.id })
            }
            Err(message) => {
                // Record first, then re-raise.
                self.tracker.finish(
                    execution.id,
                    ExecutionStatus::Failure,
                    Some(&json!({"error": message})),
                    Some(started),
                )?;
                error!(execution_id = execution.id, %message, "task failed");
                Err(ExecutionError::TaskFailed {
                    task: task_name.to_string(),
                    message,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use jobmill_catalog::TaskCatalog;
    use jobmill_core::Owner;
    use jobmill_cron::Zone;
    use jobmill_schedules::{MirrorError, NewSchedule, Schedule, ScheduleMirror};
    use rusqlite::Connection;
    use serde_json::json;

    use super::*;
    use crate::handler::{EchoTask, TaskError, TaskHandler};

    struct NullMirror;

    impl ScheduleMirror for NullMirror {
        fn upsert(&self, schedule: &Schedule) -> std::result::Result<i64, MirrorError> {
            Ok(schedule.periodic_task_id.unwrap_or(1))
        }

        fn disable(&self, _periodic_task_id: i64) -> std::result::Result<(), MirrorError> {
            Ok(())
        }
    }

    struct FailingTask;

    #[async_trait]
    impl TaskHandler for FailingTask {
        async fn run(&self, _inputs: &Value) -> std::result::Result<Value, TaskError> {
            Err(TaskError("boom".to_string()))
        }
    }

    fn fixture(
        handlers: HandlerRegistry,
    ) -> (
        TaskRunner,
        Arc<ScheduleLifecycleManager>,
        Arc<ExecutionTracker>,
        i64,
    ) {
        let schedules_conn = Connection::open_in_memory().expect("open in-memory db");
        schedules_conn
            .pragma_update(None, "foreign_keys", false)
            .expect("disable foreign keys for isolated test db");
        let schedules = Arc::new(
            ScheduleLifecycleManager::new(
                schedules_conn,
                Arc::new(TaskCatalog::builtin()),
                Arc::new(NullMirror),
                Zone::default(),
                5,
            )
            .expect("manager init failed"),
        );
        let saved = schedules
            .create(
                &Owner::new(1, "alice"),
                NewSchedule::new("send_report", "*/5 * * * *").inputs(json!({"email": "a@b.com"})),
            )
            .expect("schedule create failed");

        let tracker_conn = Connection::open_in_memory().expect("open in-memory db");
        tracker_conn
            .pragma_update(None, "foreign_keys", false)
            .expect("disable foreign keys for isolated test db");
        let tracker = Arc::new(
            ExecutionTracker::new(tracker_conn).expect("tracker init failed"),
        );
        (
            TaskRunner::new(Arc::clone(&tracker), handlers, Arc::clone(&schedules)),
            schedules,
            tracker,
            saved.schedule.id,
        )
    }

    #[tokio::test]
    async fn success_records_the_run_and_stamps_last_run() {
        let handlers = HandlerRegistry::new().register("send_report", Arc::new(EchoTask));
        let (runner, schedules, _tracker, schedule_id) = fixture(handlers);

        let execution = runner
            .run(schedule_id, "send_report", &json!({"email": "a@b.com"}))
            .await
            .expect("run failed");

        assert_eq!(execution.status, ExecutionStatus::Success);
        assert!(execution.finished_at.expect("not finished") >= execution.started_at);
        assert!(execution.runtime_ms.expect("no runtime") >= 0);
        assert_eq!(execution.logs.as_ref().unwrap()["echo"]["email"], "a@b.com");

        let schedule = schedules
            .get(&Owner::new(1, "alice"), schedule_id)
            .expect("schedule fetch failed");
        assert_eq!(
            schedule.last_run_at.map(|t| t.timestamp()),
            Some(execution.started_at.timestamp())
        );
    }

    #[tokio::test]
    async fn failure_is_recorded_then_re_raised() {
        let handlers = HandlerRegistry::new().register("send_report", Arc::new(FailingTask));
        let (runner, schedules, tracker, schedule_id) = fixture(handlers);

        let err = runner
            .run(schedule_id, "send_report", &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ExecutionError::TaskFailed { .. }));

        let history = tracker
            .list_for_schedule(schedule_id, 10)
            .expect("history failed");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].status, ExecutionStatus::Failure);
        assert_eq!(history[0].logs.as_ref().unwrap()["error"], "boom");

        // A failed fire never counts as a successful run.
        let schedule = schedules
            .get(&Owner::new(1, "alice"), schedule_id)
            .expect("schedule fetch failed");
        assert!(schedule.last_run_at.is_none());
    }

    #[tokio::test]
    async fn missing_handler_still_leaves_an_audit_record() {
        let (runner, _, tracker, schedule_id) = fixture(HandlerRegistry::new());

        let err = runner
            .run(schedule_id, "send_report", &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ExecutionError::TaskFailed { .. }));

        let history = tracker.list_for_schedule(schedule_id, 10).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].status, ExecutionStatus::Failure);
    }
}
