use std::sync::Mutex;

use chrono::Utc;
use rusqlite::Connection;
use tracing::debug;

use crate::db::init_db;
use crate::error::{PeriodicError, Result};
use crate::types::{CrontabDef, PeriodicTaskEntry};

/// SQLite-backed periodic-task store.
///
/// This is jobmill's local stand-in for the dispatcher's durable store;
/// the synchronizer only talks to it through the operations below, all of
/// which are single statements (or insert-then-read) on its own
/// `Mutex<Connection>`.
pub struct PeriodicTaskStore {
    db: Mutex<Connection>,
}

impl PeriodicTaskStore {
    /// Wrap an already-open connection, initialising the schema if needed.
    pub fn new(conn: Connection) -> Result<Self> {
        init_db(&conn)?;
        Ok(Self {
            db: Mutex::new(conn),
        })
    }

    /// Atomic "insert if absent, else fetch" for a crontab definition.
    ///
    /// INSERT OR IGNORE against the UNIQUE key plus a read-back stays
    /// correct when two callers insert the same definition concurrently.
    pub fn get_or_create_crontab(&self, def: &CrontabDef) -> Result<i64> {
        let db = self.db.lock().unwrap();
        db.execute(
            "INSERT OR IGNORE INTO crontab_defs
             (minute, hour, day_of_month, month_of_year, day_of_week, timezone)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                def.minute,
                def.hour,
                def.day_of_month,
                def.month_of_year,
                def.day_of_week,
                def.timezone
            ],
        )?;
        let id = db.query_row(
            "SELECT id FROM crontab_defs
             WHERE minute = ?1 AND hour = ?2 AND day_of_month = ?3
               AND month_of_year = ?4 AND day_of_week = ?5 AND timezone = ?6",
            rusqlite::params![
                def.minute,
                def.hour,
                def.day_of_month,
                def.month_of_year,
                def.day_of_week,
                def.timezone
            ],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    /// Create a new entry; returns the allocated id.
    pub fn create_entry(
        &self,
        name: &str,
        crontab_id: i64,
        task_handler: &str,
        args_json: &str,
        enabled: bool,
    ) -> Result<i64> {
        let now = Utc::now().to_rfc3339();
        let db = self.db.lock().unwrap();
        db.execute(
            "INSERT INTO periodic_tasks
             (name, crontab_id, task_handler, args, enabled, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            rusqlite::params![name, crontab_id, task_handler, args_json, enabled as i32, now],
        )?;
        let id = db.last_insert_rowid();
        debug!(periodic_task_id = id, %name, "periodic task created");
        Ok(id)
    }

    /// Rewrite an existing entry in place: crontab reference, handler,
    /// args, enabled flag, and name. The id never changes.
    pub fn update_entry(
        &self,
        id: i64,
        name: &str,
        crontab_id: i64,
        task_handler: &str,
        args_json: &str,
        enabled: bool,
    ) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        let db = self.db.lock().unwrap();
        let changed = db.execute(
            "UPDATE periodic_tasks
             SET name = ?2, crontab_id = ?3, task_handler = ?4,
                 args = ?5, enabled = ?6, updated_at = ?7
             WHERE id = ?1",
            rusqlite::params![id, name, crontab_id, task_handler, args_json, enabled as i32, now],
        )?;
        if changed == 0 {
            return Err(PeriodicError::EntryNotFound { id });
        }
        Ok(())
    }

    /// Disable an entry and clear its arguments. The row is kept so
    /// operators can still trace what used to fire.
    pub fn disable_entry(&self, id: i64) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        let db = self.db.lock().unwrap();
        let changed = db.execute(
            "UPDATE periodic_tasks
             SET enabled = 0, args = '[]', updated_at = ?2
             WHERE id = ?1",
            rusqlite::params![id, now],
        )?;
        if changed == 0 {
            return Err(PeriodicError::EntryNotFound { id });
        }
        debug!(periodic_task_id = id, "periodic task disabled");
        Ok(())
    }

    /// Fetch one entry, `None` when it does not exist.
    pub fn get_entry(&self, id: i64) -> Result<Option<PeriodicTaskEntry>> {
        let db = self.db.lock().unwrap();
        match db.query_row(
            "SELECT id, name, crontab_id, task_handler, args, enabled, created_at, updated_at
             FROM periodic_tasks WHERE id = ?1",
            [id],
            row_to_entry,
        ) {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Fetch one crontab definition, `None` when it does not exist.
    pub fn get_crontab(&self, id: i64) -> Result<Option<CrontabDef>> {
        let db = self.db.lock().unwrap();
        match db.query_row(
            "SELECT minute, hour, day_of_month, month_of_year, day_of_week, timezone
             FROM crontab_defs WHERE id = ?1",
            [id],
            |row| {
                Ok(CrontabDef {
                    minute: row.get(0)?,
                    hour: row.get(1)?,
                    day_of_month: row.get(2)?,
                    month_of_year: row.get(3)?,
                    day_of_week: row.get(4)?,
                    timezone: row.get(5)?,
                })
            },
        ) {
            Ok(def) => Ok(Some(def)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Total number of stored crontab definitions (operator visibility).
    pub fn crontab_count(&self) -> Result<usize> {
        let db = self.db.lock().unwrap();
        let count: i64 = db.query_row("SELECT COUNT(*) FROM crontab_defs", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

/// Map a SELECT row (fixed column order above) to an entry.
fn row_to_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<PeriodicTaskEntry> {
    let args_json: String = row.get(4)?;
    let args = serde_json::from_str(&args_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(PeriodicTaskEntry {
        id: row.get(0)?,
        name: row.get(1)?,
        crontab_id: row.get(2)?,
        task_handler: row.get(3)?,
        args,
        enabled: row.get::<_, i32>(5)? != 0,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}
