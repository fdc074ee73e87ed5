//! Task and run result models plus the progress event channel.

use std::time::Duration;

use tokio::sync::mpsc;

use crate::context::RunContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Not started. Tasks behind a failed predecessor stay here.
    Pending,
    Running,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone)]
pub struct TaskResult {
    pub task_id: String,
    pub status: TaskStatus,
    /// Attempts actually made, including retries. Zero for blocked tasks.
    pub attempts: u32,
    pub duration: Duration,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Succeeded,
    Failed,
}

/// Outcome of a whole pipeline run, including the final run context.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub pipeline_name: String,
    pub status: RunStatus,
    pub tasks: Vec<TaskResult>,
    pub context: RunContext,
}

impl RunResult {
    pub fn succeeded(&self) -> bool {
        self.status == RunStatus::Succeeded
    }

    pub fn task(&self, task_id: &str) -> Option<&TaskResult> {
        self.tasks.iter().find(|t| t.task_id == task_id)
    }
}

#[derive(Debug, Clone)]
pub enum ExecutionEvent {
    PipelineStarted {
        pipeline_name: String,
        total_tasks: usize,
    },
    TaskStarted {
        task_id: String,
        task_index: usize,
        attempt: u32,
    },
    TaskRetrying {
        task_id: String,
        /// Attempt that just failed.
        attempt: u32,
        delay: Duration,
        error: String,
    },
    TaskCompleted {
        result: TaskResult,
        task_index: usize,
    },
    PipelineCompleted {
        status: RunStatus,
        succeeded_tasks: usize,
        blocked_tasks: usize,
    },
}

pub type ProgressSender = mpsc::UnboundedSender<ExecutionEvent>;
pub type ProgressReceiver = mpsc::UnboundedReceiver<ExecutionEvent>;

pub fn progress_channel() -> (ProgressSender, ProgressReceiver) {
    mpsc::unbounded_channel()
}
