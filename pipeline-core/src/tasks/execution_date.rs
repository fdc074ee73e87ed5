//! Execution date resolver task.

use async_trait::async_trait;

use crate::context::RunContext;
use crate::error::Result;
use crate::tasks::Task;

pub const EXECUTION_DATE_TASK_ID: &str = "get_execution_date";

/// Sentinel meaning "no override supplied".
pub const NO_OVERRIDE: &str = "NA";

/// Resolves the execution date token used by every downstream task.
///
/// The override wins verbatim unless it is absent, empty, or the `"NA"`
/// sentinel, in which case the scheduler-derived default token is used. No
/// format validation happens here; a malformed override propagates and fails
/// at the first place a token is turned into a path or argument.
pub struct ExecutionDateTask {
    default_token: String,
    override_token: Option<String>,
}

impl ExecutionDateTask {
    pub fn new(default_token: impl Into<String>, override_token: Option<String>) -> Self {
        Self {
            default_token: default_token.into(),
            override_token,
        }
    }

    pub fn resolved(&self) -> &str {
        match self.override_token.as_deref() {
            Some(token) if !token.is_empty() && token != NO_OVERRIDE => token,
            _ => &self.default_token,
        }
    }
}

#[async_trait]
impl Task for ExecutionDateTask {
    fn id(&self) -> &str {
        EXECUTION_DATE_TASK_ID
    }

    async fn execute(&self, _ctx: &RunContext) -> Result<Option<String>> {
        let token = self.resolved().to_string();
        tracing::info!(token = %token, "resolved execution date");
        Ok(Some(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_wins_verbatim() {
        let task = ExecutionDateTask::new("20240802", Some("20230101".to_string()));
        assert_eq!(task.resolved(), "20230101");
    }

    #[test]
    fn sentinel_and_empty_fall_back_to_default() {
        let task = ExecutionDateTask::new("20240802", Some(NO_OVERRIDE.to_string()));
        assert_eq!(task.resolved(), "20240802");

        let task = ExecutionDateTask::new("20240802", Some(String::new()));
        assert_eq!(task.resolved(), "20240802");
    }

    #[test]
    fn absent_override_falls_back_to_default() {
        let task = ExecutionDateTask::new("20240802", None);
        assert_eq!(task.resolved(), "20240802");
    }

    #[test]
    fn malformed_override_still_propagates_verbatim() {
        let task = ExecutionDateTask::new("20240802", Some("2023-01-01".to_string()));
        assert_eq!(task.resolved(), "2023-01-01");
    }

    #[tokio::test]
    async fn execute_is_idempotent() {
        let task = ExecutionDateTask::new("20240802", Some("20230101".to_string()));
        let ctx = RunContext::new();
        let first = task.execute(&ctx).await.unwrap();
        let second = task.execute(&ctx).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.as_deref(), Some("20230101"));
    }
}
