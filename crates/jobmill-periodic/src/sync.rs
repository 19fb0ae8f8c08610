use std::sync::Arc;

use jobmill_core::config::SchedulerConfig;
use jobmill_schedules::{MirrorError, Schedule, ScheduleMirror};
use serde_json::json;
use tracing::instrument;

use crate::error::{PeriodicError, Result};
use crate::store::PeriodicTaskStore;
use crate::types::{entry_name, CrontabDef};

/// Mirrors schedules into the periodic-task store.
///
/// Implements the [`ScheduleMirror`] seam the lifecycle manager drives.
/// Every upsert derives the complete entry — crontab definition, name,
/// args triple, enabled flag — from the schedule's current fields, so
/// repeating a sync with an unchanged schedule leaves the entry
/// observably identical apart from `updated_at`.
pub struct PeriodicTaskSynchronizer {
    store: Arc<PeriodicTaskStore>,
    task_handler: String,
    timezone: String,
}

impl PeriodicTaskSynchronizer {
    pub fn new(store: Arc<PeriodicTaskStore>, config: &SchedulerConfig) -> Self {
        Self {
            store,
            task_handler: config.task_handler.clone(),
            timezone: config.timezone.clone(),
        }
    }

    /// Derive the mirrored shape from the schedule row.
    fn derive(&self, schedule: &Schedule) -> Result<(CrontabDef, String, String)> {
        let fields: Vec<&str> = schedule.cron_expression.split_whitespace().collect();
        let def = CrontabDef::from_fields(&fields, &self.timezone)
            .ok_or_else(|| PeriodicError::InvalidCrontab(schedule.cron_expression.clone()))?;
        // The dispatcher invokes the handler with exactly these three
        // positional arguments.
        let args = serde_json::to_string(&json!([
            schedule.id,
            schedule.task_name,
            schedule.inputs
        ]))?;
        Ok((def, entry_name(schedule.id, &schedule.task_name), args))
    }

    #[instrument(skip(self, schedule), fields(schedule_id = schedule.id))]
    fn try_upsert(&self, schedule: &Schedule) -> Result<i64> {
        let (def, name, args) = self.derive(schedule)?;
        let crontab_id = self.store.get_or_create_crontab(&def)?;
        let enabled = schedule.is_active();

        match schedule.periodic_task_id {
            // The allocated id is stable: only the referenced crontab,
            // args, enabled flag, and name are rewritten.
            Some(id) => {
                self.store
                    .update_entry(id, &name, crontab_id, &self.task_handler, &args, enabled)?;
                Ok(id)
            }
            None => self
                .store
                .create_entry(&name, crontab_id, &self.task_handler, &args, enabled),
        }
    }
}

impl ScheduleMirror for PeriodicTaskSynchronizer {
    fn upsert(&self, schedule: &Schedule) -> std::result::Result<i64, MirrorError> {
        self.try_upsert(schedule)
            .map_err(|e| MirrorError(e.to_string()))
    }

    fn disable(&self, periodic_task_id: i64) -> std::result::Result<(), MirrorError> {
        self.store
            .disable_entry(periodic_task_id)
            .map_err(|e| MirrorError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use jobmill_schedules::ScheduleStatus;
    use rusqlite::Connection;
    use serde_json::json;

    use super::*;

    fn synchronizer() -> (PeriodicTaskSynchronizer, Arc<PeriodicTaskStore>) {
        let store = Arc::new(
            PeriodicTaskStore::new(Connection::open_in_memory().expect("open in-memory db"))
                .expect("store init failed"),
        );
        let sync = PeriodicTaskSynchronizer::new(Arc::clone(&store), &SchedulerConfig::default());
        (sync, store)
    }

    fn schedule(id: i64, periodic_task_id: Option<i64>) -> Schedule {
        let now = Utc::now();
        Schedule {
            id,
            owner_id: 1,
            task_name: "send_report".to_string(),
            cron_expression: "*/5 * * * *".to_string(),
            inputs: json!({"email": "a@b.com"}),
            status: ScheduleStatus::Enabled,
            periodic_task_id,
            last_run_at: None,
            next_run_at: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn first_sync_creates_the_dispatcher_contract() {
        let (sync, store) = synchronizer();
        let id = sync.upsert(&schedule(42, None)).expect("upsert failed");

        let entry = store.get_entry(id).unwrap().expect("entry missing");
        assert_eq!(entry.name, "schedule:42:send_report");
        assert_eq!(entry.task_handler, "jobmill.executions.run_catalog_task");
        assert!(entry.enabled);

        let (schedule_id, task_name, inputs) = entry.args_triple().expect("bad args shape");
        assert_eq!(schedule_id, 42);
        assert_eq!(task_name, "send_report");
        assert_eq!(inputs, json!({"email": "a@b.com"}));

        let crontab = store
            .get_crontab(entry.crontab_id)
            .unwrap()
            .expect("crontab missing");
        assert_eq!(crontab.minute, "*/5");
        assert_eq!(crontab.timezone, "UTC");
    }

    #[test]
    fn resync_updates_in_place_and_keeps_the_id() {
        let (sync, store) = synchronizer();
        let first = sync.upsert(&schedule(42, None)).expect("first upsert failed");

        let mut changed = schedule(42, Some(first));
        changed.inputs = json!({"email": "ops@b.com"});
        changed.status = ScheduleStatus::Disabled;
        let second = sync.upsert(&changed).expect("second upsert failed");
        assert_eq!(first, second);

        let entry = store.get_entry(first).unwrap().expect("entry missing");
        assert!(!entry.enabled);
        let (_, _, inputs) = entry.args_triple().expect("bad args shape");
        assert_eq!(inputs, json!({"email": "ops@b.com"}));
    }

    #[test]
    fn repeated_sync_is_observably_idempotent() {
        let (sync, store) = synchronizer();
        let id = sync.upsert(&schedule(42, None)).expect("first upsert failed");
        let before = store.get_entry(id).unwrap().expect("entry missing");

        sync.upsert(&schedule(42, Some(id))).expect("repeat failed");
        let after = store.get_entry(id).unwrap().expect("entry missing");

        assert_eq!(before.name, after.name);
        assert_eq!(before.crontab_id, after.crontab_id);
        assert_eq!(before.task_handler, after.task_handler);
        assert_eq!(before.args, after.args);
        assert_eq!(before.enabled, after.enabled);
    }

    #[test]
    fn identical_expressions_share_one_crontab() {
        let (sync, store) = synchronizer();
        let a = sync.upsert(&schedule(1, None)).unwrap();
        let mut other = schedule(2, None);
        other.task_name = "reindex_search".to_string();
        other.inputs = json!({});
        let b = sync.upsert(&other).unwrap();

        let entry_a = store.get_entry(a).unwrap().unwrap();
        let entry_b = store.get_entry(b).unwrap().unwrap();
        assert_ne!(entry_a.id, entry_b.id);
        assert_eq!(entry_a.crontab_id, entry_b.crontab_id);
        assert_eq!(store.crontab_count().unwrap(), 1);
    }
}
