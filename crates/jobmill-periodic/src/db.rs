use rusqlite::Connection;

use crate::error::Result;

/// Initialise the periodic-task store schema. Safe to call on every
/// startup — CREATE IF NOT EXISTS means it's idempotent.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS crontab_defs (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            minute        TEXT NOT NULL,
            hour          TEXT NOT NULL,
            day_of_month  TEXT NOT NULL,
            month_of_year TEXT NOT NULL,
            day_of_week   TEXT NOT NULL,
            timezone      TEXT NOT NULL,
            -- one row per distinct definition; INSERT OR IGNORE relies on this
            UNIQUE (minute, hour, day_of_month, month_of_year, day_of_week, timezone)
        );

        CREATE TABLE IF NOT EXISTS periodic_tasks (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            name         TEXT    NOT NULL UNIQUE,
            crontab_id   INTEGER NOT NULL REFERENCES crontab_defs(id),
            task_handler TEXT    NOT NULL,
            args         TEXT    NOT NULL DEFAULT '[]',  -- JSON positional triple
            enabled      INTEGER NOT NULL DEFAULT 1,
            created_at   TEXT    NOT NULL,
            updated_at   TEXT    NOT NULL
        );",
    )?;
    Ok(())
}
