use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The external store's representation of the 5 cron fields plus a time
/// zone. Keyed by all six values, so schedules with identical expressions
/// share one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrontabDef {
    pub minute: String,
    pub hour: String,
    pub day_of_month: String,
    pub month_of_year: String,
    pub day_of_week: String,
    pub timezone: String,
}

impl CrontabDef {
    /// Build from raw cron fields in crontab order.
    pub fn from_fields(fields: &[&str], timezone: &str) -> Option<Self> {
        let [minute, hour, day_of_month, month_of_year, day_of_week] = fields else {
            return None;
        };
        Some(Self {
            minute: minute.to_string(),
            hour: hour.to_string(),
            day_of_month: day_of_month.to_string(),
            month_of_year: month_of_year.to_string(),
            day_of_week: day_of_week.to_string(),
            timezone: timezone.to_string(),
        })
    }
}

/// One mirrored periodic-task entry — the exact shape the external
/// dispatcher consumes to fire a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodicTaskEntry {
    pub id: i64,
    /// `schedule:{schedule_id}:{task_name}` — see [`entry_name`].
    pub name: String,
    pub crontab_id: i64,
    /// Dotted path of the handler the dispatcher invokes.
    pub task_handler: String,
    /// Ordered positional triple `[schedule_id, task_name, inputs]`.
    pub args: Value,
    pub enabled: bool,
    /// RFC3339 timestamps, bookkeeping only.
    pub created_at: String,
    pub updated_at: String,
}

impl PeriodicTaskEntry {
    /// Decode the positional args triple the dispatcher passes to the
    /// execution wrapper.
    pub fn args_triple(&self) -> Option<(i64, String, Value)> {
        let items = self.args.as_array()?;
        let [schedule_id, task_name, inputs] = items.as_slice() else {
            return None;
        };
        Some((
            schedule_id.as_i64()?,
            task_name.as_str()?.to_string(),
            inputs.clone(),
        ))
    }
}

/// Naming convention for mirrored entries. Derivable purely from the
/// schedule id and task name so operators can trace an entry back to its
/// schedule without a join.
pub fn entry_name(schedule_id: i64, task_name: &str) -> String {
    format!("schedule:{schedule_id}:{task_name}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn entry_name_is_traceable() {
        assert_eq!(entry_name(42, "send_report"), "schedule:42:send_report");
    }

    #[test]
    fn args_triple_round_trips() {
        let entry = PeriodicTaskEntry {
            id: 1,
            name: entry_name(42, "send_report"),
            crontab_id: 1,
            task_handler: "jobmill.executions.run_catalog_task".to_string(),
            args: json!([42, "send_report", {"email": "a@b.com"}]),
            enabled: true,
            created_at: String::new(),
            updated_at: String::new(),
        };
        let (schedule_id, task_name, inputs) = entry.args_triple().expect("bad args shape");
        assert_eq!(schedule_id, 42);
        assert_eq!(task_name, "send_report");
        assert_eq!(inputs, json!({"email": "a@b.com"}));
    }
}
