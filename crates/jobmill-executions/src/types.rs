use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of one recorded firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    /// The wrapper has started the task body; no outcome yet.
    Started,
    Success,
    Failure,
    /// The dispatcher rescheduled the firing after a failure.
    Retry,
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ExecutionStatus::Started => "started",
            ExecutionStatus::Success => "success",
            ExecutionStatus::Failure => "failure",
            ExecutionStatus::Retry => "retry",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for ExecutionStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "started" => Ok(ExecutionStatus::Started),
            "success" => Ok(ExecutionStatus::Success),
            "failure" => Ok(ExecutionStatus::Failure),
            "retry" => Ok(ExecutionStatus::Retry),
            other => Err(format!("unknown execution status: {other}")),
        }
    }
}

/// One append-only audit record of a schedule firing.
///
/// Rows are never deleted — not even when the parent schedule is
/// soft-deleted — so the history behind every schedule stays complete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Execution {
    pub id: i64,
    pub schedule_id: i64,
    /// Snapshot of the task name at fire time; survives catalog changes.
    pub task_name: String,
    pub started_at: DateTime<Utc>,
    /// NULL until `finish` runs; always ≥ `started_at` once set.
    pub finished_at: Option<DateTime<Utc>>,
    pub status: ExecutionStatus,
    pub runtime_ms: Option<i64>,
    /// Structured task output, or `{"error": …}` on failure.
    pub logs: Option<Value>,
}
