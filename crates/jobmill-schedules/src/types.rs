use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// User-facing schedule state. Soft deletion is not a status — it is the
/// `deleted_at` tombstone, which additionally forces `Disabled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleStatus {
    #[default]
    Enabled,
    Disabled,
}

impl std::fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ScheduleStatus::Enabled => "enabled",
            ScheduleStatus::Disabled => "disabled",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for ScheduleStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "enabled" => Ok(ScheduleStatus::Enabled),
            "disabled" => Ok(ScheduleStatus::Disabled),
            other => Err(format!("unknown schedule status: {other}")),
        }
    }
}

/// A persisted recurring job definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    /// INTEGER primary key — also the first positional argument of the
    /// mirrored periodic-task entry.
    pub id: i64,
    pub owner_id: i64,
    /// References a catalogued `TaskDefinition` by name.
    pub task_name: String,
    /// Always exactly 5 whitespace-separated, validated cron fields.
    pub cron_expression: String,
    /// JSON object validated against the task's input schema.
    pub inputs: Value,
    pub status: ScheduleStatus,
    /// External periodic-task id. Allocated once by the mirror on first
    /// sync and stable for the schedule's lifetime.
    pub periodic_task_id: Option<i64>,
    pub last_run_at: Option<DateTime<Utc>>,
    /// Projection of the next fire; cleared or stale-but-ignored while
    /// the schedule is disabled.
    pub next_run_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Tombstone. Set once, never cleared.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Schedule {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Enabled and not tombstoned — the state counted against the quota.
    pub fn is_active(&self) -> bool {
        self.status == ScheduleStatus::Enabled && !self.is_deleted()
    }
}

/// Request payload for `create`.
#[derive(Debug, Clone)]
pub struct NewSchedule {
    pub task_name: String,
    pub cron_expression: String,
    pub inputs: Value,
    pub status: ScheduleStatus,
}

impl NewSchedule {
    pub fn new(task_name: impl Into<String>, cron_expression: impl Into<String>) -> Self {
        Self {
            task_name: task_name.into(),
            cron_expression: cron_expression.into(),
            inputs: Value::Object(Default::default()),
            status: ScheduleStatus::Enabled,
        }
    }

    pub fn inputs(mut self, inputs: Value) -> Self {
        self.inputs = inputs;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.status = ScheduleStatus::Disabled;
        self
    }
}

/// Partial update for `update`; `None` fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct SchedulePatch {
    pub cron_expression: Option<String>,
    pub inputs: Option<Value>,
    pub status: Option<ScheduleStatus>,
}

/// Whether the external periodic-task entry reflects the schedule row.
///
/// `Pending` is the "saved but not yet mirrored" state: the schedule write
/// committed, the mirror upsert did not. Retry via
/// [`crate::manager::ScheduleLifecycleManager::resync`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorState {
    Mirrored,
    Pending(String),
}

/// Result of a successful create/update: the durable row plus the mirror
/// outcome.
#[derive(Debug, Clone)]
pub struct SavedSchedule {
    pub schedule: Schedule,
    pub mirror: MirrorState,
}

impl SavedSchedule {
    pub fn is_mirrored(&self) -> bool {
        self.mirror == MirrorState::Mirrored
    }
}
