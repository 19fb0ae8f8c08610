use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Default limit on concurrently enabled schedules per non-privileged owner.
pub const DEFAULT_SCHEDULE_QUOTA: usize = 5;
/// Dotted handler path written into every mirrored periodic-task entry.
pub const DEFAULT_TASK_HANDLER: &str = "jobmill.executions.run_catalog_task";
/// SQLite busy handler timeout — bounds waits on the shared database file.
pub const BUSY_TIMEOUT_MS: u32 = 3_000;

/// Top-level config (jobmill.toml + JOBMILL_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobmillConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

impl Default for JobmillConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            scheduler: SchedulerConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Scheduling knobs shared by the lifecycle manager and the mirror.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Process time zone used for next-fire projection and written into
    /// mirrored crontab definitions. `"UTC"` or a fixed `±HH:MM` offset.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Max concurrently enabled, non-deleted schedules per owner.
    /// Privileged owners are never bounded.
    #[serde(default = "default_quota")]
    pub max_enabled_per_owner: usize,
    /// Handler path stamped onto every mirrored periodic-task entry so the
    /// external dispatcher knows what to invoke.
    #[serde(default = "default_task_handler")]
    pub task_handler: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            max_enabled_per_owner: default_quota(),
            task_handler: default_task_handler(),
        }
    }
}

fn default_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.jobmill/jobmill.db", home)
}
fn default_timezone() -> String {
    "UTC".to_string()
}
fn default_quota() -> usize {
    DEFAULT_SCHEDULE_QUOTA
}
fn default_task_handler() -> String {
    DEFAULT_TASK_HANDLER.to_string()
}

impl JobmillConfig {
    /// Load config from a TOML file with JOBMILL_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. ~/.jobmill/jobmill.toml
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: JobmillConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("JOBMILL_").split("_"))
            .extract()
            .map_err(|e| crate::error::CoreError::Config(e.to_string()))?;

        Ok(config)
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.jobmill/jobmill.toml", home)
}
