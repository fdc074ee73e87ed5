//! Sequential pipeline executor with a uniform retry policy.

use std::time::Instant;

use crate::config::TaskDefaults;
use crate::context::RunContext;
use crate::models::{
    ExecutionEvent, ProgressSender, RunResult, RunStatus, TaskResult, TaskStatus,
};
use crate::pipeline::Pipeline;
use crate::tasks::Task;

pub struct PipelineExecutor {
    defaults: TaskDefaults,
    progress: Option<ProgressSender>,
}

impl PipelineExecutor {
    pub fn new(defaults: TaskDefaults) -> Self {
        Self {
            defaults,
            progress: None,
        }
    }

    pub fn with_progress(mut self, tx: ProgressSender) -> Self {
        self.progress = Some(tx);
        self
    }

    fn emit(&self, event: ExecutionEvent) {
        if let Some(tx) = &self.progress {
            let _ = tx.send(event);
        }
    }

    /// Run every task in order. A failed task blocks all successors; they
    /// stay `Pending` in the result.
    pub async fn execute(&self, pipeline: Pipeline, mut ctx: RunContext) -> RunResult {
        self.emit(ExecutionEvent::PipelineStarted {
            pipeline_name: pipeline.name.clone(),
            total_tasks: pipeline.tasks.len(),
        });
        tracing::info!(
            pipeline = %pipeline.name,
            owner = %self.defaults.owner,
            "pipeline run started"
        );

        let mut results = Vec::with_capacity(pipeline.tasks.len());
        let mut failed = false;

        for (index, task) in pipeline.tasks.iter().enumerate() {
            if failed {
                let blocked = TaskResult {
                    task_id: task.id().to_string(),
                    status: TaskStatus::Pending,
                    attempts: 0,
                    duration: std::time::Duration::ZERO,
                    error: None,
                };
                self.emit(ExecutionEvent::TaskCompleted {
                    result: blocked.clone(),
                    task_index: index,
                });
                results.push(blocked);
                continue;
            }

            let result = self.run_task(task.as_ref(), &mut ctx, index).await;
            if result.status == TaskStatus::Failed {
                failed = true;
            }
            self.emit(ExecutionEvent::TaskCompleted {
                result: result.clone(),
                task_index: index,
            });
            results.push(result);
        }

        let status = if failed {
            RunStatus::Failed
        } else {
            RunStatus::Succeeded
        };
        let succeeded_tasks = results
            .iter()
            .filter(|r| r.status == TaskStatus::Succeeded)
            .count();
        let blocked_tasks = results
            .iter()
            .filter(|r| r.status == TaskStatus::Pending)
            .count();

        self.emit(ExecutionEvent::PipelineCompleted {
            status,
            succeeded_tasks,
            blocked_tasks,
        });
        tracing::info!(pipeline = %pipeline.name, ?status, "pipeline run finished");

        RunResult {
            pipeline_name: pipeline.name,
            status,
            tasks: results,
            context: ctx,
        }
    }

    async fn run_task(&self, task: &dyn Task, ctx: &mut RunContext, index: usize) -> TaskResult {
        let start = Instant::now();
        let max_attempts = self.defaults.retries + 1;
        let mut attempt = 0;

        loop {
            attempt += 1;
            self.emit(ExecutionEvent::TaskStarted {
                task_id: task.id().to_string(),
                task_index: index,
                attempt,
            });
            tracing::info!(task_id = task.id(), attempt, "task started");

            match task.execute(ctx).await {
                Ok(value) => {
                    if let Some(value) = value {
                        if let Err(e) = ctx.publish(task.id(), value) {
                            return TaskResult {
                                task_id: task.id().to_string(),
                                status: TaskStatus::Failed,
                                attempts: attempt,
                                duration: start.elapsed(),
                                error: Some(e.to_string()),
                            };
                        }
                    }
                    tracing::info!(task_id = task.id(), attempt, "task succeeded");
                    return TaskResult {
                        task_id: task.id().to_string(),
                        status: TaskStatus::Succeeded,
                        attempts: attempt,
                        duration: start.elapsed(),
                        error: None,
                    };
                }
                Err(e) if attempt < max_attempts => {
                    tracing::warn!(
                        task_id = task.id(),
                        attempt,
                        error = %e,
                        "task failed, retrying"
                    );
                    self.emit(ExecutionEvent::TaskRetrying {
                        task_id: task.id().to_string(),
                        attempt,
                        delay: self.defaults.retry_delay,
                        error: e.to_string(),
                    });
                    tokio::time::sleep(self.defaults.retry_delay).await;
                }
                Err(e) => {
                    tracing::error!(task_id = task.id(), attempt, error = %e, "task failed");
                    return TaskResult {
                        task_id: task.id().to_string(),
                        status: TaskStatus::Failed,
                        attempts: attempt,
                        duration: start.elapsed(),
                        error: Some(e.to_string()),
                    };
                }
            }
        }
    }
}
