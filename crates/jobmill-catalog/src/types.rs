use serde::{Deserialize, Serialize};

/// Declared type of a single task input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Int,
    #[default]
    Str,
    Email,
    Date,
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FieldType::Int => "int",
            FieldType::Str => "str",
            FieldType::Email => "email",
            FieldType::Date => "date",
        };
        write!(f, "{s}")
    }
}

/// One field of a task's declarative input schema.
///
/// The serialized shape is what operators author and what lands in the
/// `task_definitions` table: `{"name": "days", "type": "int",
/// "required": false, "min": 1, "max": 30}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    /// Inclusive lower bound, `int` fields only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    /// Inclusive upper bound, `int` fields only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
    /// Allowed values, `str` fields only.
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<String>>,
    /// chrono format string, `date` fields only. Defaults to `%Y-%m-%d`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl FieldSpec {
    /// Minimal spec: `name` with a type, optional, unconstrained.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: false,
            min: None,
            max: None,
            one_of: None,
            format: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn range(mut self, min: i64, max: i64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    pub fn one_of(mut self, values: &[&str]) -> Self {
        self.one_of = Some(values.iter().map(|v| v.to_string()).collect());
        self
    }
}

/// Immutable catalog entry describing a task owners may schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDefinition {
    /// Unique key; referenced by schedules and mirrored periodic tasks.
    pub name: String,
    pub description: String,
    /// Ordered field specs — validation reports errors in schema order.
    pub inputs_schema: Vec<FieldSpec>,
    /// Non-schedulable tasks exist in the catalog (e.g. internal jobs) but
    /// are rejected at schedule creation.
    pub schedulable: bool,
}
