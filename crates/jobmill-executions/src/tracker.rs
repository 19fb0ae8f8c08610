use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde_json::Value;
use tracing::instrument;

use crate::db::{init_db, row_to_execution, EXECUTION_COLUMNS};
use crate::error::{ExecutionError, Result};
use crate::types::{Execution, ExecutionStatus};

/// Creates and finalises Execution rows.
///
/// Both operations touch a single row keyed by its own id, so a plain
/// `Mutex<Connection>` is all the locking this store needs.
pub struct ExecutionTracker {
    db: Mutex<Connection>,
}

impl ExecutionTracker {
    /// Wrap an already-open connection, initialising the schema if needed.
    pub fn new(conn: Connection) -> Result<Self> {
        init_db(&conn)?;
        Ok(Self {
            db: Mutex::new(conn),
        })
    }

    /// Open a record for a firing that is about to run.
    #[instrument(skip(self))]
    pub fn start(&self, schedule_id: i64, task_name: &str) -> Result<Execution> {
        let now = Utc::now();
        let db = self.db.lock().unwrap();
        db.execute(
            "INSERT INTO executions (schedule_id, task_name, started_at, status)
             VALUES (?1, ?2, ?3, 'started')",
            rusqlite::params![schedule_id, task_name, now.to_rfc3339()],
        )?;
        let id = db.last_insert_rowid();
        fetch(&db, id)?.ok_or(ExecutionError::NotFound { id })
    }

    /// Finalise a record: outcome status, optional structured logs, and —
    /// when the caller supplies its start instant — the runtime in
    /// milliseconds.
    #[instrument(skip(self, logs))]
    pub fn finish(
        &self,
        execution_id: i64,
        status: ExecutionStatus,
        logs: Option<&Value>,
        started: Option<DateTime<Utc>>,
    ) -> Result<()> {
        let finished = Utc::now();
        let runtime_ms = started.map(|s| (finished - s).num_milliseconds().max(0));
        let logs_json = logs.map(serde_json::to_string).transpose()?;

        let db = self.db.lock().unwrap();
        // COALESCE keeps the stored value when the caller omits logs or a
        // start instant.
        let changed = db.execute(
            "UPDATE executions
             SET status = ?2, finished_at = ?3,
                 runtime_ms = COALESCE(?4, runtime_ms),
                 logs = COALESCE(?5, logs)
             WHERE id = ?1",
            rusqlite::params![
                execution_id,
                status.to_string(),
                finished.to_rfc3339(),
                runtime_ms,
                logs_json
            ],
        )?;
        if changed == 0 {
            return Err(ExecutionError::NotFound { id: execution_id });
        }
        Ok(())
    }

    /// Fetch one record, `None` when it does not exist.
    pub fn get(&self, id: i64) -> Result<Option<Execution>> {
        let db = self.db.lock().unwrap();
        fetch(&db, id)
    }

    /// History for one schedule, newest first.
    pub fn list_for_schedule(&self, schedule_id: i64, limit: usize) -> Result<Vec<Execution>> {
        let db = self.db.lock().unwrap();
        let sql = format!(
            "SELECT {EXECUTION_COLUMNS} FROM executions
             WHERE schedule_id = ?1 ORDER BY started_at DESC LIMIT ?2"
        );
        let mut stmt = db.prepare(&sql)?;
        let rows = stmt.query_map(
            rusqlite::params![schedule_id, limit as i64],
            row_to_execution,
        )?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }
}

fn fetch(conn: &Connection, id: i64) -> Result<Option<Execution>> {
    let sql = format!("SELECT {EXECUTION_COLUMNS} FROM executions WHERE id = ?1");
    match conn.query_row(&sql, [id], row_to_execution) {
        Ok(execution) => Ok(Some(execution)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn tracker() -> ExecutionTracker {
        let conn = Connection::open_in_memory().expect("open in-memory db");
        conn.pragma_update(None, "foreign_keys", false)
            .expect("disable foreign keys for isolated test db");
        ExecutionTracker::new(conn).expect("tracker init failed")
    }

    #[test]
    fn start_opens_a_started_record() {
        let t = tracker();
        let execution = t.start(1, "send_report").expect("start failed");
        assert_eq!(execution.status, ExecutionStatus::Started);
        assert_eq!(execution.task_name, "send_report");
        assert!(execution.finished_at.is_none());
        assert!(execution.runtime_ms.is_none());
    }

    #[test]
    fn finish_orders_timestamps_and_clamps_runtime() {
        let t = tracker();
        let execution = t.start(1, "send_report").expect("start failed");

        t.finish(
            execution.id,
            ExecutionStatus::Success,
            Some(&json!({"ok": true})),
            Some(execution.started_at),
        )
        .expect("finish failed");

        let done = t.get(execution.id).unwrap().expect("record vanished");
        assert_eq!(done.status, ExecutionStatus::Success);
        let finished = done.finished_at.expect("finished_at not set");
        assert!(finished >= done.started_at);
        assert!(done.runtime_ms.expect("runtime not set") >= 0);
        assert_eq!(done.logs, Some(json!({"ok": true})));
    }

    #[test]
    fn finish_without_start_instant_leaves_runtime_null() {
        let t = tracker();
        let execution = t.start(1, "send_report").expect("start failed");
        t.finish(execution.id, ExecutionStatus::Retry, None, None)
            .expect("finish failed");

        let done = t.get(execution.id).unwrap().expect("record vanished");
        assert_eq!(done.status, ExecutionStatus::Retry);
        assert!(done.runtime_ms.is_none());
        assert!(done.logs.is_none());
    }

    #[test]
    fn finishing_a_missing_record_is_an_error() {
        let t = tracker();
        assert!(matches!(
            t.finish(404, ExecutionStatus::Success, None, None),
            Err(ExecutionError::NotFound { id: 404 })
        ));
    }

    #[test]
    fn history_lists_newest_first() {
        let t = tracker();
        for _ in 0..3 {
            let e = t.start(7, "reindex_search").unwrap();
            t.finish(e.id, ExecutionStatus::Success, None, Some(e.started_at))
                .unwrap();
        }
        t.start(8, "send_report").unwrap();

        let history = t.list_for_schedule(7, 10).expect("list failed");
        assert_eq!(history.len(), 3);
        assert!(history.windows(2).all(|w| w[0].started_at >= w[1].started_at));
    }
}
