use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::Connection;

use crate::error::Result;
use crate::types::{Execution, ExecutionStatus};

pub(crate) const EXECUTION_COLUMNS: &str =
    "id, schedule_id, task_name, started_at, finished_at, status, runtime_ms, logs";

/// Initialise the executions schema. Safe to call on every startup —
/// CREATE IF NOT EXISTS means it's idempotent.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS executions (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            schedule_id INTEGER NOT NULL REFERENCES schedules(id),
            task_name   TEXT    NOT NULL,
            started_at  TEXT    NOT NULL,
            finished_at TEXT,
            status      TEXT    NOT NULL DEFAULT 'started',
            runtime_ms  INTEGER,
            logs        TEXT                -- JSON or NULL
        );

        -- Per-schedule history reads newest-first.
        CREATE INDEX IF NOT EXISTS idx_executions_schedule
            ON executions (schedule_id, started_at DESC);",
    )?;
    Ok(())
}

/// Map a SELECT row (column order from EXECUTION_COLUMNS) to an Execution.
pub(crate) fn row_to_execution(row: &rusqlite::Row<'_>) -> rusqlite::Result<Execution> {
    let status_str: String = row.get(5)?;
    let status: ExecutionStatus = status_str
        .parse()
        .map_err(|e: String| rusqlite::Error::InvalidColumnType(5, e, Type::Text))?;
    let logs_json: Option<String> = row.get(7)?;
    let logs = logs_json
        .map(|raw| {
            serde_json::from_str(&raw)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(7, Type::Text, Box::new(e)))
        })
        .transpose()?;

    Ok(Execution {
        id: row.get(0)?,
        schedule_id: row.get(1)?,
        task_name: row.get(2)?,
        started_at: get_timestamp(row, 3)?.ok_or_else(|| {
            rusqlite::Error::InvalidColumnType(3, "started_at is NULL".into(), Type::Text)
        })?,
        finished_at: get_timestamp(row, 4)?,
        status,
        runtime_ms: row.get(6)?,
        logs,
    })
}

fn get_timestamp(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| {
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}
