use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::Connection;

use crate::error::Result;
use crate::types::{Schedule, ScheduleStatus};

/// Column order shared by every SELECT in this crate. Centralised here so
/// `row_to_schedule` stays consistent with each query.
pub(crate) const SCHEDULE_COLUMNS: &str = "id, owner_id, task_name, cron_expression, inputs, \
     status, periodic_task_id, last_run_at, next_run_at, created_at, updated_at, deleted_at";

/// Initialise the schedules schema. Safe to call on every startup —
/// CREATE IF NOT EXISTS means it's idempotent.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schedules (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            owner_id         INTEGER NOT NULL,
            task_name        TEXT    NOT NULL REFERENCES task_definitions(name),
            cron_expression  TEXT    NOT NULL,
            inputs           TEXT    NOT NULL DEFAULT '{}', -- JSON object
            status           TEXT    NOT NULL DEFAULT 'enabled',
            periodic_task_id INTEGER,                       -- allocated once by the mirror
            last_run_at      TEXT,                          -- RFC3339 or NULL
            next_run_at      TEXT,
            created_at       TEXT    NOT NULL,
            updated_at       TEXT    NOT NULL,
            deleted_at       TEXT                           -- tombstone, never cleared
        );

        -- Quota counting and owner-scoped listing both hit (owner, status).
        CREATE INDEX IF NOT EXISTS idx_schedules_owner_status
            ON schedules (owner_id, status);
        CREATE INDEX IF NOT EXISTS idx_schedules_periodic_task
            ON schedules (periodic_task_id);",
    )?;
    Ok(())
}

/// Map a SELECT row (column order from SCHEDULE_COLUMNS) to a Schedule.
pub(crate) fn row_to_schedule(row: &rusqlite::Row<'_>) -> rusqlite::Result<Schedule> {
    let inputs_json: String = row.get(4)?;
    let inputs = serde_json::from_str(&inputs_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;
    let status_str: String = row.get(5)?;
    let status: ScheduleStatus = status_str
        .parse()
        .map_err(|e: String| rusqlite::Error::InvalidColumnType(5, e, Type::Text))?;

    Ok(Schedule {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        task_name: row.get(2)?,
        cron_expression: row.get(3)?,
        inputs,
        status,
        periodic_task_id: row.get(6)?,
        last_run_at: get_timestamp(row, 7)?,
        next_run_at: get_timestamp(row, 8)?,
        created_at: get_timestamp(row, 9)?.ok_or_else(|| {
            rusqlite::Error::InvalidColumnType(9, "created_at is NULL".into(), Type::Text)
        })?,
        updated_at: get_timestamp(row, 10)?.ok_or_else(|| {
            rusqlite::Error::InvalidColumnType(10, "updated_at is NULL".into(), Type::Text)
        })?,
        deleted_at: get_timestamp(row, 11)?,
    })
}

/// Read an optional RFC3339 TEXT column as a UTC instant.
fn get_timestamp(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| {
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}
