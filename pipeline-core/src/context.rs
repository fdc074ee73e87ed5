//! Cross-task value handoff for a single pipeline run.

use std::collections::HashMap;

use crate::error::{PipelineError, Result};

/// Write-once key-value store keyed by task id.
///
/// This is the explicit form of the orchestrator's cross-task value store:
/// the executor publishes a task's returned value under its id, and
/// downstream tasks pull it by the producer's id. A key can be written
/// exactly once per run.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    values: HashMap<String, String>,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a value under `task_id`. Fails if the id already holds one.
    pub fn publish(&mut self, task_id: &str, value: String) -> Result<()> {
        if self.values.contains_key(task_id) {
            return Err(PipelineError::DuplicateContextKey(task_id.to_string()));
        }
        self.values.insert(task_id.to_string(), value);
        Ok(())
    }

    /// Pull the value published by `task_id`, failing if there is none.
    pub fn pull(&self, task_id: &str) -> Result<&str> {
        self.values
            .get(task_id)
            .map(String::as_str)
            .ok_or_else(|| PipelineError::MissingContextKey(task_id.to_string()))
    }

    pub fn get(&self, task_id: &str) -> Option<&str> {
        self.values.get(task_id).map(String::as_str)
    }
}
