use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use jobmill_catalog::{validate_inputs, TaskCatalog};
use jobmill_core::Owner;
use jobmill_cron::{next_fire_time, CronExpr, Zone};
use rusqlite::{Connection, TransactionBehavior};
use tracing::{info, instrument, warn};

use crate::db::{init_db, row_to_schedule, SCHEDULE_COLUMNS};
use crate::error::{Result, ScheduleError};
use crate::mirror::ScheduleMirror;
use crate::query::ScheduleQuery;
use crate::types::{
    MirrorState, NewSchedule, SavedSchedule, Schedule, SchedulePatch, ScheduleStatus,
};

/// Owns every Schedule mutation and read path.
///
/// Wraps a single SQLite connection in a `Mutex`; mutations that must not
/// race (the quota's check-then-insert) additionally run inside an
/// IMMEDIATE transaction, so the limit holds under concurrent requests
/// against the same store.
pub struct ScheduleLifecycleManager {
    db: Mutex<Connection>,
    catalog: Arc<TaskCatalog>,
    mirror: Arc<dyn ScheduleMirror>,
    zone: Zone,
    quota: usize,
}

impl ScheduleLifecycleManager {
    /// Wrap an already-open connection, initialising the schema if needed.
    pub fn new(
        conn: Connection,
        catalog: Arc<TaskCatalog>,
        mirror: Arc<dyn ScheduleMirror>,
        zone: Zone,
        quota: usize,
    ) -> Result<Self> {
        init_db(&conn)?;
        Ok(Self {
            db: Mutex::new(conn),
            catalog,
            mirror,
            zone,
            quota,
        })
    }

    /// Create a schedule after running the full validation pipeline:
    /// catalog lookup, cron, inputs, then quota.
    #[instrument(skip(self, request), fields(owner = %owner, task = %request.task_name))]
    pub fn create(&self, owner: &Owner, request: NewSchedule) -> Result<SavedSchedule> {
        let task = self
            .catalog
            .get(&request.task_name)
            .filter(|t| t.schedulable)
            .ok_or_else(|| ScheduleError::TaskNotSchedulable {
                name: request.task_name.clone(),
            })?;
        let expr = CronExpr::parse(&request.cron_expression)
            .map_err(|e| ScheduleError::InvalidCron(e.to_string()))?;
        let field_errors = validate_inputs(&task.inputs_schema, &request.inputs);
        if !field_errors.is_empty() {
            return Err(ScheduleError::InvalidInputs(field_errors));
        }

        let now = Utc::now();
        let next_run = next_fire_time(&expr, now, &self.zone);
        let inputs_json = serde_json::to_string(&request.inputs)?;

        let schedule = {
            let mut db = self.db.lock().unwrap();
            let tx = db.transaction_with_behavior(TransactionBehavior::Immediate)?;
            // The count and the insert share one transaction scope, so two
            // concurrent creates for the same owner cannot both pass the gate.
            if request.status == ScheduleStatus::Enabled && !owner.privileged {
                let active = count_active(&tx, owner.id, None)?;
                if active >= self.quota {
                    return Err(ScheduleError::QuotaExceeded { limit: self.quota });
                }
            }
            tx.execute(
                "INSERT INTO schedules
                 (owner_id, task_name, cron_expression, inputs, status,
                  next_run_at, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
                rusqlite::params![
                    owner.id,
                    task.name,
                    expr.to_string(),
                    inputs_json,
                    request.status.to_string(),
                    next_run.map(|t| t.to_rfc3339()),
                    now.to_rfc3339(),
                ],
            )?;
            let id = tx.last_insert_rowid();
            let schedule = fetch(&tx, id)?.ok_or(ScheduleError::NotFound { id })?;
            tx.commit()?;
            schedule
        };

        info!(schedule_id = schedule.id, "schedule created");
        Ok(self.mirror_after_write(schedule))
    }

    /// Apply a partial update. The merged (existing + patch) state goes
    /// through the same validation pipeline as `create`; the quota count
    /// excludes the schedule itself.
    #[instrument(skip(self, patch), fields(owner = %owner, schedule_id = id))]
    pub fn update(&self, owner: &Owner, id: i64, patch: SchedulePatch) -> Result<SavedSchedule> {
        let now = Utc::now();
        let schedule = {
            let mut db = self.db.lock().unwrap();
            let tx = db.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let existing = fetch_visible(&tx, owner, id)?;
            if existing.is_deleted() {
                // The tombstone is absorbing: a deleted schedule cannot be
                // toggled back; callers must create a new one.
                return Err(ScheduleError::NotFound { id });
            }

            let merged_cron = patch
                .cron_expression
                .unwrap_or_else(|| existing.cron_expression.clone());
            let merged_inputs = patch.inputs.unwrap_or_else(|| existing.inputs.clone());
            let merged_status = patch.status.unwrap_or(existing.status);

            let task = self.catalog.get(&existing.task_name).ok_or_else(|| {
                ScheduleError::TaskNotSchedulable {
                    name: existing.task_name.clone(),
                }
            })?;
            let expr = CronExpr::parse(&merged_cron)
                .map_err(|e| ScheduleError::InvalidCron(e.to_string()))?;
            let field_errors = validate_inputs(&task.inputs_schema, &merged_inputs);
            if !field_errors.is_empty() {
                return Err(ScheduleError::InvalidInputs(field_errors));
            }
            if merged_status == ScheduleStatus::Enabled && !owner.privileged {
                let active = count_active(&tx, existing.owner_id, Some(id))?;
                if active >= self.quota {
                    return Err(ScheduleError::QuotaExceeded { limit: self.quota });
                }
            }

            let next_run = next_fire_time(&expr, now, &self.zone);
            tx.execute(
                "UPDATE schedules
                 SET cron_expression = ?2, inputs = ?3, status = ?4,
                     next_run_at = ?5, updated_at = ?6
                 WHERE id = ?1",
                rusqlite::params![
                    id,
                    expr.to_string(),
                    serde_json::to_string(&merged_inputs)?,
                    merged_status.to_string(),
                    next_run.map(|t| t.to_rfc3339()),
                    now.to_rfc3339(),
                ],
            )?;
            let schedule = fetch(&tx, id)?.ok_or(ScheduleError::NotFound { id })?;
            tx.commit()?;
            schedule
        };

        info!(schedule_id = id, status = %schedule.status, "schedule updated");
        Ok(self.mirror_after_write(schedule))
    }

    /// Tombstone a schedule: set `deleted_at`, force Disabled, then disable
    /// the mirrored entry and clear its arguments.
    ///
    /// Repeating the call on an already-deleted schedule is a no-op apart
    /// from re-disabling the mirror, which makes a failed mirror disable
    /// safely retryable.
    #[instrument(skip(self), fields(owner = %owner, schedule_id = id))]
    pub fn soft_delete(&self, owner: &Owner, id: i64) -> Result<()> {
        let schedule = {
            let db = self.db.lock().unwrap();
            let schedule = fetch_visible(&db, owner, id)?;
            if !schedule.is_deleted() {
                db.execute(
                    "UPDATE schedules
                     SET deleted_at = ?2, status = 'disabled', updated_at = ?2
                     WHERE id = ?1",
                    rusqlite::params![id, Utc::now().to_rfc3339()],
                )?;
            }
            schedule
        };

        if let Some(periodic_task_id) = schedule.periodic_task_id {
            self.mirror
                .disable(periodic_task_id)
                .map_err(|e| ScheduleError::SyncFailure(e.to_string()))?;
        }
        info!(schedule_id = id, "schedule soft-deleted");
        Ok(())
    }

    /// Record a successful fire. Called by the execution wrapper, so it is
    /// keyed by id alone — the dispatcher carries no owner context.
    pub fn record_fired(&self, id: i64, fired_at: DateTime<Utc>) -> Result<()> {
        let db = self.db.lock().unwrap();
        let changed = db.execute(
            "UPDATE schedules SET last_run_at = ?2 WHERE id = ?1",
            rusqlite::params![id, fired_at.to_rfc3339()],
        )?;
        if changed == 0 {
            return Err(ScheduleError::NotFound { id });
        }
        Ok(())
    }

    /// Fetch one schedule the caller may see. Tombstoned rows are returned
    /// too: the audit trail stays reachable after soft delete.
    pub fn get(&self, owner: &Owner, id: i64) -> Result<Schedule> {
        let db = self.db.lock().unwrap();
        fetch_visible(&db, owner, id)
    }

    /// List schedules matching `query`, capability-scoped to the caller.
    pub fn list(&self, owner: &Owner, query: &ScheduleQuery) -> Result<Vec<Schedule>> {
        let (tail, params) = query.to_sql(owner);
        let sql = format!("SELECT {SCHEDULE_COLUMNS} FROM schedules{tail}");
        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare(&sql)?;
        let rows = stmt.query_map(
            rusqlite::params_from_iter(params.iter().map(|p| p.as_ref())),
            row_to_schedule,
        )?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    /// Retry the mirror step alone for a saved-but-not-mirrored schedule.
    pub fn resync(&self, owner: &Owner, id: i64) -> Result<SavedSchedule> {
        let schedule = {
            let db = self.db.lock().unwrap();
            fetch_visible(&db, owner, id)?
        };
        if schedule.is_deleted() {
            // A tombstoned schedule's mirror is kept disabled, never upserted.
            if let Some(periodic_task_id) = schedule.periodic_task_id {
                self.mirror
                    .disable(periodic_task_id)
                    .map_err(|e| ScheduleError::SyncFailure(e.to_string()))?;
            }
            return Ok(SavedSchedule {
                schedule,
                mirror: MirrorState::Mirrored,
            });
        }
        Ok(self.mirror_after_write(schedule))
    }

    // --- private helpers ---------------------------------------------------

    /// Upsert the mirrored entry, then persist the mirror outcome in one
    /// restricted write: the allocated id (first sync only) plus a fresh
    /// next-run projection.
    fn mirror_after_write(&self, schedule: Schedule) -> SavedSchedule {
        let periodic_task_id = match self.mirror.upsert(&schedule) {
            Ok(id) => id,
            Err(e) => {
                warn!(
                    schedule_id = schedule.id,
                    error = %e,
                    "periodic-task sync failed; schedule saved, mirror pending"
                );
                return SavedSchedule {
                    schedule,
                    mirror: MirrorState::Pending(e.to_string()),
                };
            }
        };
        match self.store_mirror_outcome(&schedule, periodic_task_id) {
            Ok(updated) => SavedSchedule {
                schedule: updated,
                mirror: MirrorState::Mirrored,
            },
            Err(e) => {
                warn!(schedule_id = schedule.id, error = %e, "mirror bookkeeping write failed");
                SavedSchedule {
                    schedule,
                    mirror: MirrorState::Pending(e.to_string()),
                }
            }
        }
    }

    fn store_mirror_outcome(&self, schedule: &Schedule, periodic_task_id: i64) -> Result<Schedule> {
        // Recomputed at mirror time so the projection reflects the instant
        // the entry was written. A recomputation failure clears the
        // projection instead of aborting the sync (decision in DESIGN.md).
        let next_run = CronExpr::parse(&schedule.cron_expression)
            .ok()
            .and_then(|expr| next_fire_time(&expr, Utc::now(), &self.zone));
        if next_run.is_none() {
            warn!(
                schedule_id = schedule.id,
                cron = %schedule.cron_expression,
                "next-run recomputation failed; clearing next_run_at"
            );
        }
        let db = self.db.lock().unwrap();
        // COALESCE keeps the first allocation: the external id is never
        // reallocated for the lifetime of the schedule.
        db.execute(
            "UPDATE schedules
             SET periodic_task_id = COALESCE(periodic_task_id, ?2), next_run_at = ?3
             WHERE id = ?1",
            rusqlite::params![
                schedule.id,
                periodic_task_id,
                next_run.map(|t| t.to_rfc3339())
            ],
        )?;
        fetch(&db, schedule.id)?.ok_or(ScheduleError::NotFound { id: schedule.id })
    }
}

/// Fetch by id without visibility rules (manager-internal).
fn fetch(conn: &Connection, id: i64) -> Result<Option<Schedule>> {
    let sql = format!("SELECT {SCHEDULE_COLUMNS} FROM schedules WHERE id = ?1");
    match conn.query_row(&sql, [id], row_to_schedule) {
        Ok(schedule) => Ok(Some(schedule)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Fetch by id and enforce the ownership capability: non-privileged
/// callers only ever see their own rows.
fn fetch_visible(conn: &Connection, owner: &Owner, id: i64) -> Result<Schedule> {
    let schedule = fetch(conn, id)?.ok_or(ScheduleError::NotFound { id })?;
    if !owner.privileged && schedule.owner_id != owner.id {
        return Err(ScheduleError::PermissionDenied {
            reason: format!("schedule {id} belongs to another owner"),
        });
    }
    Ok(schedule)
}

/// Enabled ∧ non-deleted count for the quota gate, optionally excluding
/// one schedule (the one being updated).
fn count_active(conn: &Connection, owner_id: i64, exclude: Option<i64>) -> Result<usize> {
    let count: i64 = match exclude {
        Some(id) => conn.query_row(
            "SELECT COUNT(*) FROM schedules
             WHERE owner_id = ?1 AND status = 'enabled' AND deleted_at IS NULL AND id != ?2",
            rusqlite::params![owner_id, id],
            |row| row.get(0),
        )?,
        None => conn.query_row(
            "SELECT COUNT(*) FROM schedules
             WHERE owner_id = ?1 AND status = 'enabled' AND deleted_at IS NULL",
            rusqlite::params![owner_id],
            |row| row.get(0),
        )?,
    };
    Ok(count as usize)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

    use serde_json::json;

    use super::*;
    use crate::mirror::MirrorError;

    /// Test double for the periodic-task mirror: allocates ids from 100,
    /// records calls, and can be switched into failure mode.
    #[derive(Default)]
    struct RecordingMirror {
        allocations: AtomicI64,
        upserts: Mutex<Vec<(i64, Option<i64>)>>,
        disabled: Mutex<Vec<i64>>,
        fail: AtomicBool,
    }

    impl ScheduleMirror for RecordingMirror {
        fn upsert(&self, schedule: &Schedule) -> std::result::Result<i64, MirrorError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(MirrorError("periodic-task store offline".to_string()));
            }
            self.upserts
                .lock()
                .unwrap()
                .push((schedule.id, schedule.periodic_task_id));
            Ok(schedule
                .periodic_task_id
                .unwrap_or_else(|| 100 + self.allocations.fetch_add(1, Ordering::SeqCst)))
        }

        fn disable(&self, periodic_task_id: i64) -> std::result::Result<(), MirrorError> {
            self.disabled.lock().unwrap().push(periodic_task_id);
            Ok(())
        }
    }

    fn manager(mirror: Arc<RecordingMirror>) -> ScheduleLifecycleManager {
        let conn = Connection::open_in_memory().expect("open in-memory db");
        conn.pragma_update(None, "foreign_keys", false)
            .expect("disable foreign keys for isolated test db");
        ScheduleLifecycleManager::new(
            conn,
            Arc::new(TaskCatalog::builtin()),
            mirror,
            Zone::default(),
            5,
        )
        .expect("manager init failed")
    }

    fn alice() -> Owner {
        Owner::new(1, "alice")
    }

    fn report_request() -> NewSchedule {
        NewSchedule::new("send_report", "*/5 * * * *").inputs(json!({"email": "a@b.com"}))
    }

    #[test]
    fn create_rejects_unknown_and_internal_tasks() {
        let m = manager(Arc::default());
        let err = m
            .create(&alice(), NewSchedule::new("no_such_task", "* * * * *"))
            .unwrap_err();
        assert!(matches!(err, ScheduleError::TaskNotSchedulable { .. }));

        let err = m
            .create(&alice(), NewSchedule::new("heavy_etl", "* * * * *"))
            .unwrap_err();
        assert!(matches!(err, ScheduleError::TaskNotSchedulable { .. }));
    }

    #[test]
    fn create_rejects_malformed_cron() {
        let m = manager(Arc::default());
        let err = m
            .create(
                &alice(),
                NewSchedule::new("send_report", "0 0 0 * *").inputs(json!({"email": "a@b.com"})),
            )
            .unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidCron(_)));
        assert_eq!(err.code(), "INVALID_CRON");
    }

    #[test]
    fn create_reports_field_errors() {
        let m = manager(Arc::default());
        let err = m
            .create(&alice(), NewSchedule::new("send_report", "* * * * *"))
            .unwrap_err();
        match err {
            ScheduleError::InvalidInputs(map) => {
                assert_eq!(map.get("email").map(String::as_str), Some("required"));
            }
            other => panic!("expected InvalidInputs, got {other:?}"),
        }
    }

    #[test]
    fn create_persists_projects_and_mirrors() {
        let mirror = Arc::new(RecordingMirror::default());
        let m = manager(mirror.clone());
        let saved = m.create(&alice(), report_request()).expect("create failed");

        assert!(saved.is_mirrored());
        let schedule = &saved.schedule;
        assert_eq!(schedule.periodic_task_id, Some(100));
        assert!(schedule.next_run_at.expect("no projection") > Utc::now());
        assert_eq!(mirror.upserts.lock().unwrap().len(), 1);
    }

    #[test]
    fn quota_blocks_the_sixth_enabled_schedule() {
        let m = manager(Arc::default());
        for _ in 0..5 {
            m.create(&alice(), NewSchedule::new("reindex_search", "*/10 * * * *"))
                .expect("create under quota failed");
        }
        let err = m
            .create(&alice(), NewSchedule::new("reindex_search", "*/10 * * * *"))
            .unwrap_err();
        assert!(matches!(err, ScheduleError::QuotaExceeded { limit: 5 }));

        // Disabled schedules do not count against the quota.
        m.create(
            &alice(),
            NewSchedule::new("reindex_search", "*/10 * * * *").disabled(),
        )
        .expect("disabled create should bypass quota");
    }

    #[test]
    fn privileged_owners_are_never_bounded() {
        let m = manager(Arc::default());
        let root = Owner::privileged(9, "root");
        for _ in 0..7 {
            m.create(&root, NewSchedule::new("reindex_search", "*/10 * * * *"))
                .expect("privileged create failed");
        }
    }

    #[test]
    fn update_recomputes_projection_and_keeps_external_id() {
        let m = manager(Arc::default());
        let saved = m.create(&alice(), report_request()).expect("create failed");
        let id = saved.schedule.id;
        let external = saved.schedule.periodic_task_id;

        let before = Utc::now();
        let patch = SchedulePatch {
            cron_expression: Some("0 0 * * *".to_string()),
            ..Default::default()
        };
        let updated = m.update(&alice(), id, patch).expect("update failed");

        assert_eq!(updated.schedule.cron_expression, "0 0 * * *");
        assert!(updated.schedule.next_run_at.expect("no projection") > before);
        // The external id survives every re-sync.
        assert_eq!(updated.schedule.periodic_task_id, external);
    }

    #[test]
    fn update_quota_count_excludes_the_schedule_itself() {
        let m = manager(Arc::default());
        let mut last = 0;
        for _ in 0..5 {
            last = m
                .create(&alice(), NewSchedule::new("reindex_search", "*/10 * * * *"))
                .expect("create failed")
                .schedule
                .id;
        }
        // Re-saving an already-enabled schedule must not trip the gate.
        let patch = SchedulePatch {
            cron_expression: Some("*/15 * * * *".to_string()),
            ..Default::default()
        };
        m.update(&alice(), last, patch).expect("update failed");
    }

    #[test]
    fn soft_delete_tombstones_and_disables_the_mirror() {
        let mirror = Arc::new(RecordingMirror::default());
        let m = manager(mirror.clone());
        let saved = m.create(&alice(), report_request()).expect("create failed");
        let id = saved.schedule.id;

        m.soft_delete(&alice(), id).expect("soft delete failed");

        let schedule = m.get(&alice(), id).expect("tombstoned row not queryable");
        assert!(schedule.is_deleted());
        assert_eq!(schedule.status, ScheduleStatus::Disabled);
        assert_eq!(mirror.disabled.lock().unwrap().as_slice(), &[100]);

        // The tombstone is absorbing.
        let patch = SchedulePatch {
            status: Some(ScheduleStatus::Enabled),
            ..Default::default()
        };
        assert!(matches!(
            m.update(&alice(), id, patch),
            Err(ScheduleError::NotFound { .. })
        ));

        // Repeating the delete just re-disables the mirror.
        m.soft_delete(&alice(), id).expect("repeat delete failed");
        assert_eq!(mirror.disabled.lock().unwrap().len(), 2);
    }

    #[test]
    fn foreign_rows_are_invisible_to_non_privileged_owners() {
        let m = manager(Arc::default());
        let saved = m.create(&alice(), report_request()).expect("create failed");
        let id = saved.schedule.id;
        let bob = Owner::new(2, "bob");

        assert!(matches!(
            m.get(&bob, id),
            Err(ScheduleError::PermissionDenied { .. })
        ));
        assert!(matches!(
            m.soft_delete(&bob, id),
            Err(ScheduleError::PermissionDenied { .. })
        ));

        let root = Owner::privileged(9, "root");
        assert_eq!(m.get(&root, id).expect("privileged get failed").id, id);
    }

    #[test]
    fn listing_is_capability_scoped() {
        let m = manager(Arc::default());
        m.create(&alice(), report_request()).expect("create failed");
        let bob = Owner::new(2, "bob");
        m.create(&bob, NewSchedule::new("reindex_search", "*/10 * * * *"))
            .expect("create failed");

        assert_eq!(m.list(&alice(), &ScheduleQuery::default()).unwrap().len(), 1);
        let root = Owner::privileged(9, "root");
        assert_eq!(m.list(&root, &ScheduleQuery::default()).unwrap().len(), 2);

        let enabled_only = ScheduleQuery {
            status: Some(ScheduleStatus::Enabled),
            ..Default::default()
        };
        assert_eq!(m.list(&root, &enabled_only).unwrap().len(), 2);
    }

    #[test]
    fn mirror_failure_leaves_schedule_saved_and_pending() {
        let mirror = Arc::new(RecordingMirror::default());
        mirror.fail.store(true, Ordering::SeqCst);
        let m = manager(mirror.clone());

        let saved = m.create(&alice(), report_request()).expect("create failed");
        assert!(matches!(saved.mirror, MirrorState::Pending(_)));
        assert_eq!(saved.schedule.periodic_task_id, None);

        // The row is durable; retrying the sync step alone completes it.
        mirror.fail.store(false, Ordering::SeqCst);
        let resynced = m
            .resync(&alice(), saved.schedule.id)
            .expect("resync failed");
        assert!(resynced.is_mirrored());
        assert_eq!(resynced.schedule.periodic_task_id, Some(100));
    }

    #[test]
    fn record_fired_stamps_last_run() {
        let m = manager(Arc::default());
        let saved = m.create(&alice(), report_request()).expect("create failed");
        let fired_at = Utc::now();

        m.record_fired(saved.schedule.id, fired_at)
            .expect("record_fired failed");
        let schedule = m.get(&alice(), saved.schedule.id).unwrap();
        assert_eq!(
            schedule.last_run_at.map(|t| t.timestamp()),
            Some(fired_at.timestamp())
        );

        assert!(matches!(
            m.record_fired(9999, fired_at),
            Err(ScheduleError::NotFound { .. })
        ));
    }

    #[test]
    fn concurrent_creates_never_exceed_the_quota() {
        let m = Arc::new(manager(Arc::default()));
        for _ in 0..4 {
            m.create(&alice(), NewSchedule::new("reindex_search", "*/10 * * * *"))
                .expect("setup create failed");
        }

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let m = Arc::clone(&m);
                std::thread::spawn(move || {
                    m.create(&alice(), NewSchedule::new("reindex_search", "*/10 * * * *"))
                        .is_ok()
                })
            })
            .collect();
        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap_or(false))
            .filter(|ok| *ok)
            .count();

        assert_eq!(successes, 1);
        let all = m
            .list(
                &alice(),
                &ScheduleQuery {
                    status: Some(ScheduleStatus::Enabled),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(all.len(), 5);
    }
}
