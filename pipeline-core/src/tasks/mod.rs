// Pipeline tasks
// The three stages of the car rental load, behind a common trait

pub mod customer_merge;
pub mod execution_date;
pub mod spark_submit;

pub use customer_merge::CustomerMergeTask;
pub use execution_date::ExecutionDateTask;
pub use spark_submit::SparkSubmitTask;

use async_trait::async_trait;

use crate::context::RunContext;
use crate::error::Result;

/// A single unit of work in the pipeline.
///
/// Tasks communicate only through the run context: a task may return a
/// value, which the executor publishes under the task's id before any
/// successor starts.
#[async_trait]
pub trait Task: Send + Sync {
    fn id(&self) -> &str;

    async fn execute(&self, ctx: &RunContext) -> Result<Option<String>>;
}
