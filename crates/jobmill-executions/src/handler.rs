use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};
use thiserror::Error;

/// Domain failure raised by a task body. Carries a message only — the
/// wrapper records it into the execution's logs and re-raises.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TaskError(pub String);

/// A task body the dispatcher can invoke through [`crate::TaskRunner`].
///
/// `inputs` is the schedule's validated payload; the returned value
/// becomes the execution's structured logs.
#[async_trait]
pub trait TaskHandler: Send + Sync {
    async fn run(&self, inputs: &Value) -> std::result::Result<Value, TaskError>;
}

/// Maps catalog task names to their handler implementations.
///
/// Built once at process start alongside the task catalog; a catalogued
/// task with no registered handler fails at fire time, not at schedule
/// time, mirroring how the dispatcher resolves handlers by name.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn TaskHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, task_name: impl Into<String>, handler: Arc<dyn TaskHandler>) -> Self {
        self.handlers.insert(task_name.into(), handler);
        self
    }

    pub fn get(&self, task_name: &str) -> Option<&Arc<dyn TaskHandler>> {
        self.handlers.get(task_name)
    }
}

/// Built-in handler backing the seed tasks: echoes its inputs with the
/// fire timestamp.
pub struct EchoTask;

#[async_trait]
impl TaskHandler for EchoTask {
    async fn run(&self, inputs: &Value) -> std::result::Result<Value, TaskError> {
        Ok(json!({
            "echo": inputs,
            "ts": Utc::now().to_rfc3339(),
        }))
    }
}
