use std::collections::BTreeMap;

use crate::types::{FieldSpec, FieldType, TaskDefinition};

/// In-memory, read-only task catalog.
///
/// Constructed once at process start (from [`builtin`] or
/// [`crate::db::load`]) and shared by reference — components never reach
/// for a global registry.
pub struct TaskCatalog {
    tasks: BTreeMap<String, TaskDefinition>,
}

impl TaskCatalog {
    pub fn new(definitions: Vec<TaskDefinition>) -> Self {
        let tasks = definitions
            .into_iter()
            .map(|def| (def.name.clone(), def))
            .collect();
        Self { tasks }
    }

    /// Catalog backed by the built-in seed registry.
    pub fn builtin() -> Self {
        Self::new(builtin())
    }

    pub fn get(&self, name: &str) -> Option<&TaskDefinition> {
        self.tasks.get(name)
    }

    /// All definitions, name-ordered.
    pub fn iter(&self) -> impl Iterator<Item = &TaskDefinition> {
        self.tasks.values()
    }

    /// Only the tasks owners are allowed to schedule, name-ordered.
    pub fn schedulable(&self) -> impl Iterator<Item = &TaskDefinition> {
        self.tasks.values().filter(|t| t.schedulable)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// The built-in seed registry.
///
/// `heavy_etl` is deliberately catalogued but not schedulable: it documents
/// that the catalog may carry internal-only jobs that owners cannot bind a
/// schedule to.
pub fn builtin() -> Vec<TaskDefinition> {
    vec![
        TaskDefinition {
            name: "send_report".to_string(),
            description: "Send periodic report".to_string(),
            inputs_schema: vec![
                FieldSpec::new("email", FieldType::Email).required(),
                FieldSpec::new("days", FieldType::Int).range(1, 30),
            ],
            schedulable: true,
        },
        TaskDefinition {
            name: "reindex_search".to_string(),
            description: "Rebuild search index".to_string(),
            inputs_schema: vec![
                FieldSpec::new("segment", FieldType::Str).one_of(&["all", "news", "users"]),
            ],
            schedulable: true,
        },
        TaskDefinition {
            name: "heavy_etl".to_string(),
            description: "Heavy ETL (not user-schedulable)".to_string(),
            inputs_schema: vec![],
            schedulable: false,
        },
    ]
}
