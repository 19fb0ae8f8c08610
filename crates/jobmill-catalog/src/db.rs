use chrono::Utc;
use rusqlite::Connection;
use tracing::info;

use crate::error::{CatalogError, Result};
use crate::types::TaskDefinition;

/// Initialise the task catalog schema. Safe to call on every startup —
/// CREATE IF NOT EXISTS means it's idempotent.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS task_definitions (
            name          TEXT PRIMARY KEY NOT NULL,
            description   TEXT NOT NULL DEFAULT '',
            inputs_schema TEXT NOT NULL DEFAULT '[]',  -- JSON array of field specs
            schedulable   INTEGER NOT NULL DEFAULT 1,
            created_at    TEXT NOT NULL
        );",
    )?;
    Ok(())
}

/// Upsert `definitions` into the catalog table, returning how many were
/// newly created. Re-seeding updates descriptions/schemas in place and
/// never duplicates rows.
pub fn seed(conn: &Connection, definitions: &[TaskDefinition]) -> Result<usize> {
    let now = Utc::now().to_rfc3339();
    let mut created = 0;
    for def in definitions {
        let schema_json =
            serde_json::to_string(&def.inputs_schema).map_err(|e| CatalogError::InvalidSchema {
                name: def.name.clone(),
                reason: e.to_string(),
            })?;
        // ON CONFLICT UPDATE reports 1 changed row just like a fresh
        // insert, so check existence first to count true creations.
        let exists = match conn.query_row(
            "SELECT 1 FROM task_definitions WHERE name = ?1",
            [&def.name],
            |_| Ok(()),
        ) {
            Ok(()) => true,
            Err(rusqlite::Error::QueryReturnedNoRows) => false,
            Err(e) => return Err(e.into()),
        };
        conn.execute(
            "INSERT INTO task_definitions (name, description, inputs_schema, schedulable, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(name) DO UPDATE SET
                 description   = excluded.description,
                 inputs_schema = excluded.inputs_schema,
                 schedulable   = excluded.schedulable",
            rusqlite::params![
                def.name,
                def.description,
                schema_json,
                def.schedulable as i32,
                now
            ],
        )?;
        if !exists {
            created += 1;
        }
    }
    info!(total = definitions.len(), created, "task catalog seeded");
    Ok(created)
}

/// Load every stored definition, name-ordered.
pub fn load(conn: &Connection) -> Result<Vec<TaskDefinition>> {
    let mut stmt = conn.prepare(
        "SELECT name, description, inputs_schema, schedulable
         FROM task_definitions ORDER BY name",
    )?;
    let rows: Vec<(String, String, String, i32)> = stmt
        .query_map([], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
        })?
        .filter_map(|r| r.ok())
        .collect();

    let mut definitions = Vec::with_capacity(rows.len());
    for (name, description, schema_json, schedulable) in rows {
        let inputs_schema =
            serde_json::from_str(&schema_json).map_err(|e| CatalogError::InvalidSchema {
                name: name.clone(),
                reason: e.to_string(),
            })?;
        definitions.push(TaskDefinition {
            name,
            description,
            inputs_schema,
            schedulable: schedulable != 0,
        });
    }
    Ok(definitions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry;

    fn mem_conn() -> Connection {
        let conn = Connection::open_in_memory().expect("open in-memory db");
        init_db(&conn).expect("init_db failed");
        conn
    }

    #[test]
    fn seed_then_load_round_trips() {
        let conn = mem_conn();
        let defs = registry::builtin();
        let created = seed(&conn, &defs).expect("seed failed");
        assert_eq!(created, 3);

        let loaded = load(&conn).expect("load failed");
        assert_eq!(loaded.len(), 3);
        let report = loaded.iter().find(|d| d.name == "send_report").unwrap();
        assert!(report.schedulable);
        assert_eq!(report.inputs_schema.len(), 2);
    }

    #[test]
    fn reseeding_is_idempotent() {
        let conn = mem_conn();
        let defs = registry::builtin();
        seed(&conn, &defs).expect("first seed failed");
        let created = seed(&conn, &defs).expect("second seed failed");
        assert_eq!(created, 0);
        assert_eq!(load(&conn).unwrap().len(), 3);
    }
}
