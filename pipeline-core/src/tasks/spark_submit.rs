//! Spark job submission task.

use async_trait::async_trait;
use tokio::process::Command;

use crate::config::SparkSettings;
use crate::context::RunContext;
use crate::dates::{date_argument, ExecutionDate};
use crate::error::{PipelineError, Result};
use crate::tasks::execution_date::EXECUTION_DATE_TASK_ID;
use crate::tasks::Task;

pub const SPARK_SUBMIT_TASK_ID: &str = "submit_spark_job";

/// Submits the configured Spark application with the resolved date as its
/// single application argument.
pub struct SparkSubmitTask {
    settings: SparkSettings,
}

impl SparkSubmitTask {
    pub fn new(settings: SparkSettings) -> Self {
        Self { settings }
    }

    /// Application arguments for a resolved date.
    pub fn application_args(date: ExecutionDate) -> Vec<String> {
        vec![date_argument(date)]
    }
}

#[async_trait]
impl Task for SparkSubmitTask {
    fn id(&self) -> &str {
        SPARK_SUBMIT_TASK_ID
    }

    async fn execute(&self, ctx: &RunContext) -> Result<Option<String>> {
        let date = ExecutionDate::parse(ctx.pull(EXECUTION_DATE_TASK_ID)?)?;
        let args = Self::application_args(date);

        tracing::info!(
            conn_id = %self.settings.conn_id,
            application = %self.settings.application.display(),
            args = ?args,
            "submitting spark job"
        );

        let output = Command::new(&self.settings.submit_bin)
            .arg(&self.settings.application)
            .args(&args)
            .output()
            .await
            .map_err(|e| {
                PipelineError::JobSubmit(format!(
                    "failed to spawn {}: {e}",
                    self.settings.submit_bin
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PipelineError::JobSubmit(format!(
                "{} exited with {}: {}",
                self.settings.submit_bin,
                output.status,
                stderr.trim()
            )));
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_date_argument() {
        let date = ExecutionDate::parse("20240802").unwrap();
        assert_eq!(
            SparkSubmitTask::application_args(date),
            vec!["--date=20240802".to_string()]
        );
    }

    #[tokio::test]
    async fn nonzero_exit_is_a_submission_failure() {
        let task = SparkSubmitTask::new(SparkSettings {
            conn_id: "spark_conn".to_string(),
            submit_bin: "sh".to_string(),
            application: "/nonexistent/job.sh".into(),
        });
        let mut ctx = RunContext::new();
        ctx.publish(EXECUTION_DATE_TASK_ID, "20240802".to_string())
            .unwrap();

        let err = task.execute(&ctx).await.unwrap_err();
        assert!(matches!(err, PipelineError::JobSubmit(_)));
    }

    #[tokio::test]
    async fn missing_submit_binary_is_a_submission_failure() {
        let task = SparkSubmitTask::new(SparkSettings {
            conn_id: "spark_conn".to_string(),
            submit_bin: "definitely-not-spark-submit".to_string(),
            application: "job.py".into(),
        });
        let mut ctx = RunContext::new();
        ctx.publish(EXECUTION_DATE_TASK_ID, "20240802".to_string())
            .unwrap();

        let err = task.execute(&ctx).await.unwrap_err();
        assert!(matches!(err, PipelineError::JobSubmit(_)));
    }
}
