use std::str::FromStr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use rusqlite::Connection;
use tracing::{info, warn};

use jobmill_catalog::{registry, TaskCatalog};
use jobmill_core::{config::JobmillConfig, Owner};
use jobmill_cron::Zone;
use jobmill_executions::{
    EchoTask, ExecutionTracker, HandlerRegistry, TaskRunner,
};
use jobmill_periodic::{PeriodicTaskStore, PeriodicTaskSynchronizer};
use jobmill_schedules::{
    MirrorState, NewSchedule, SavedSchedule, ScheduleLifecycleManager, SchedulePatch,
    ScheduleQuery, ScheduleStatus,
};

#[derive(Parser)]
#[command(name = "jobmill", about = "Recurring-job schedules with a durable audit trail", version)]
struct Cli {
    /// Path to jobmill.toml (defaults to ~/.jobmill/jobmill.toml).
    #[arg(long, global = true)]
    config: Option<String>,
    /// Owner id to act as. Identity resolution lives outside this tool.
    #[arg(long, global = true, default_value_t = 1)]
    owner: i64,
    /// Act with privileged (operator) capabilities: no quota, full visibility.
    #[arg(long, global = true)]
    privileged: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Seed the task catalog with the built-in registry (idempotent).
    Seed,
    /// List catalogued tasks and their input schemas.
    Tasks,
    /// Create a schedule.
    Create {
        #[arg(long)]
        task: String,
        /// 5-field cron expression, e.g. "*/5 * * * *".
        #[arg(long)]
        cron: String,
        /// JSON object with task inputs.
        #[arg(long, default_value = "{}")]
        inputs: String,
        /// Create in disabled state.
        #[arg(long)]
        disabled: bool,
    },
    /// List schedules visible to the acting owner.
    List {
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        task: Option<String>,
        #[arg(long)]
        include_deleted: bool,
    },
    /// Show one schedule.
    Show { id: i64 },
    /// Update a schedule's cron, inputs, or status.
    Update {
        id: i64,
        #[arg(long)]
        cron: Option<String>,
        #[arg(long)]
        inputs: Option<String>,
        /// "enabled" or "disabled".
        #[arg(long)]
        status: Option<String>,
    },
    /// Soft-delete a schedule (tombstone; history is kept).
    Delete { id: i64 },
    /// Retry mirroring for a saved-but-not-mirrored schedule.
    Resync { id: i64 },
    /// Show execution history for a schedule.
    Executions {
        id: i64,
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Fire a schedule by hand through the execution wrapper.
    Fire { id: i64 },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jobmill=info".into()),
        )
        .init();

    let cli = Cli::parse();

    // load config: explicit path > JOBMILL_CONFIG env > ~/.jobmill/jobmill.toml
    let config_path = cli
        .config
        .clone()
        .or_else(|| std::env::var("JOBMILL_CONFIG").ok());
    let config = JobmillConfig::load(config_path.as_deref()).unwrap_or_else(|e| {
        warn!("Config load failed ({}), using defaults", e);
        JobmillConfig::default()
    });
    let zone = Zone::parse(&config.scheduler.timezone)?;

    let db_path = &config.database.path;
    ensure_parent_dir(db_path);
    info!(path = %db_path, "opening SQLite database");

    // run all schema migrations (idempotent)
    let db = open_db(db_path)?;
    jobmill_catalog::db::init_db(&db)?;
    jobmill_schedules::db::init_db(&db)?;
    jobmill_periodic::db::init_db(&db)?;
    jobmill_executions::db::init_db(&db)?;

    if let Command::Seed = cli.command {
        let created = jobmill_catalog::db::seed(&db, &registry::builtin())?;
        println!("Seeded. New: {created}");
        return Ok(());
    }

    // catalog: stored definitions win; a fresh database falls back to the
    // built-in registry so read-only commands work before `seed` runs
    let stored = jobmill_catalog::db::load(&db)?;
    let catalog = Arc::new(if stored.is_empty() {
        TaskCatalog::builtin()
    } else {
        TaskCatalog::new(stored)
    });

    // build subsystems — each gets its own connection for thread safety
    let store = Arc::new(PeriodicTaskStore::new(open_db(db_path)?)?);
    let synchronizer = Arc::new(PeriodicTaskSynchronizer::new(
        Arc::clone(&store),
        &config.scheduler,
    ));
    let schedules = Arc::new(ScheduleLifecycleManager::new(
        open_db(db_path)?,
        Arc::clone(&catalog),
        synchronizer,
        zone,
        config.scheduler.max_enabled_per_owner,
    )?);
    let tracker = Arc::new(ExecutionTracker::new(open_db(db_path)?)?);
    let handlers = HandlerRegistry::new()
        .register("send_report", Arc::new(EchoTask))
        .register("reindex_search", Arc::new(EchoTask));
    let runner = TaskRunner::new(Arc::clone(&tracker), handlers, Arc::clone(&schedules));

    let owner = if cli.privileged {
        Owner::privileged(cli.owner, "operator")
    } else {
        Owner::new(cli.owner, "operator")
    };

    match cli.command {
        Command::Seed => unreachable!("handled above"),

        Command::Tasks => {
            for task in catalog.schedulable() {
                println!("{} — {}", task.name, task.description);
                for field in &task.inputs_schema {
                    let required = if field.required { "required" } else { "optional" };
                    println!("    {} ({}, {})", field.name, field.field_type, required);
                }
            }
        }

        Command::Create {
            task,
            cron,
            inputs,
            disabled,
        } => {
            let mut request = NewSchedule::new(task, cron).inputs(serde_json::from_str(&inputs)?);
            if disabled {
                request = request.disabled();
            }
            let saved = schedules.create(&owner, request)?;
            print_saved(&saved);
        }

        Command::List {
            status,
            task,
            include_deleted,
        } => {
            let query = ScheduleQuery {
                status: status.map(|s| parse_status(&s)).transpose()?,
                task_name: task,
                include_deleted,
                ..Default::default()
            };
            for schedule in schedules.list(&owner, &query)? {
                println!("{}", serde_json::to_string(&schedule)?);
            }
        }

        Command::Show { id } => {
            let schedule = schedules.get(&owner, id)?;
            println!("{}", serde_json::to_string_pretty(&schedule)?);
        }

        Command::Update {
            id,
            cron,
            inputs,
            status,
        } => {
            let patch = SchedulePatch {
                cron_expression: cron,
                inputs: inputs.map(|raw| serde_json::from_str(&raw)).transpose()?,
                status: status.map(|s| parse_status(&s)).transpose()?,
            };
            let saved = schedules.update(&owner, id, patch)?;
            print_saved(&saved);
        }

        Command::Delete { id } => {
            schedules.soft_delete(&owner, id)?;
            println!("Schedule {id} deleted (history kept)");
        }

        Command::Resync { id } => {
            let saved = schedules.resync(&owner, id)?;
            print_saved(&saved);
        }

        Command::Executions { id, limit } => {
            // Capability check first: history is as visible as the schedule.
            schedules.get(&owner, id)?;
            for execution in tracker.list_for_schedule(id, limit)? {
                println!("{}", serde_json::to_string(&execution)?);
            }
        }

        Command::Fire { id } => {
            let schedule = schedules.get(&owner, id)?;
            let execution = runner
                .run(schedule.id, &schedule.task_name, &schedule.inputs)
                .await?;
            println!("{}", serde_json::to_string_pretty(&execution)?);
        }
    }

    Ok(())
}

fn print_saved(saved: &SavedSchedule) {
    match &saved.mirror {
        MirrorState::Mirrored => {
            println!(
                "{}",
                serde_json::to_string_pretty(&saved.schedule).unwrap_or_default()
            );
        }
        MirrorState::Pending(reason) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&saved.schedule).unwrap_or_default()
            );
            eprintln!(
                "warning: schedule saved but not yet mirrored ({reason}); run `jobmill resync {}`",
                saved.schedule.id
            );
        }
    }
}

fn parse_status(raw: &str) -> anyhow::Result<ScheduleStatus> {
    ScheduleStatus::from_str(&raw.to_ascii_lowercase()).map_err(|e| anyhow::anyhow!(e))
}

/// Open the shared database file with the pragmas every subsystem
/// connection needs: WAL for concurrent readers, enforced foreign keys,
/// and a bounded busy wait.
fn open_db(path: &str) -> anyhow::Result<Connection> {
    let conn = Connection::open(path)?;
    conn.execute_batch(&format!(
        "PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON; PRAGMA busy_timeout={};",
        jobmill_core::config::BUSY_TIMEOUT_MS
    ))?;
    Ok(conn)
}

fn ensure_parent_dir(path: &str) {
    if let Some(parent) = std::path::Path::new(path).parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            warn!("could not create {}: {}", parent.display(), e);
        }
    }
}
