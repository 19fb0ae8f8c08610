use jobmill_core::Owner;
use rusqlite::ToSql;

use crate::types::ScheduleStatus;

/// Sort order for schedule listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    #[default]
    CreatedDesc,
    NextRunAsc,
    LastRunDesc,
}

impl Order {
    fn sql(self) -> &'static str {
        match self {
            Order::CreatedDesc => "created_at DESC",
            Order::NextRunAsc => "next_run_at ASC",
            Order::LastRunDesc => "last_run_at DESC",
        }
    }
}

/// Declarative filter set for `list`.
///
/// Visibility is not part of the filter: the capability check runs first
/// and pins non-privileged callers to their own rows regardless of what
/// `owner_id` asks for.
#[derive(Debug, Clone, Default)]
pub struct ScheduleQuery {
    pub status: Option<ScheduleStatus>,
    pub task_name: Option<String>,
    /// Scope to one owner. Only honoured for privileged callers.
    pub owner_id: Option<i64>,
    /// Tombstoned rows are excluded unless explicitly requested.
    pub include_deleted: bool,
    pub order: Order,
    pub limit: Option<usize>,
}

impl ScheduleQuery {
    /// Render the WHERE/ORDER BY tail and its bind parameters.
    ///
    /// The capability rule: a non-privileged owner always gets
    /// `owner_id = self`, a privileged owner gets whatever scope the
    /// query asks for (or everything).
    pub(crate) fn to_sql(&self, caller: &Owner) -> (String, Vec<Box<dyn ToSql>>) {
        let mut predicates: Vec<String> = Vec::new();
        let mut params: Vec<Box<dyn ToSql>> = Vec::new();

        let scope = if caller.privileged {
            self.owner_id
        } else {
            Some(caller.id)
        };
        if let Some(owner_id) = scope {
            params.push(Box::new(owner_id));
            predicates.push(format!("owner_id = ?{}", params.len()));
        }
        if let Some(status) = self.status {
            params.push(Box::new(status.to_string()));
            predicates.push(format!("status = ?{}", params.len()));
        }
        if let Some(task_name) = &self.task_name {
            params.push(Box::new(task_name.clone()));
            predicates.push(format!("task_name = ?{}", params.len()));
        }
        if !self.include_deleted {
            predicates.push("deleted_at IS NULL".to_string());
        }

        let mut sql = String::new();
        if !predicates.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&predicates.join(" AND "));
        }
        sql.push_str(" ORDER BY ");
        sql.push_str(self.order.sql());
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        (sql, params)
    }
}
