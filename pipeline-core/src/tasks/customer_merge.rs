//! SCD2 merge task for the customer dimension.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::context::RunContext;
use crate::dates::ExecutionDate;
use crate::error::Result;
use crate::stage::{read_staged_customers, staged_path};
use crate::tasks::execution_date::EXECUTION_DATE_TASK_ID;
use crate::tasks::Task;
use crate::warehouse::Warehouse;

pub const MERGE_TASK_ID: &str = "merge_customer_dim";

/// Reads the staged customer file for the resolved date and hands it to the
/// warehouse as one atomic merge.
pub struct CustomerMergeTask {
    stage_dir: PathBuf,
    warehouse: Arc<dyn Warehouse>,
}

impl CustomerMergeTask {
    pub fn new(stage_dir: PathBuf, warehouse: Arc<dyn Warehouse>) -> Self {
        Self {
            stage_dir,
            warehouse,
        }
    }
}

#[async_trait]
impl Task for CustomerMergeTask {
    fn id(&self) -> &str {
        MERGE_TASK_ID
    }

    async fn execute(&self, ctx: &RunContext) -> Result<Option<String>> {
        let token = ctx.pull(EXECUTION_DATE_TASK_ID)?;
        // First point where a malformed override fails the run.
        let date = ExecutionDate::parse(token)?;

        let path = staged_path(&self.stage_dir, date);
        let batch = read_staged_customers(&path)?;

        let summary = self.warehouse.merge_customer_dim(&batch, Utc::now()).await?;
        tracing::info!(
            conn_id = self.warehouse.conn_id(),
            staged = %path.display(),
            records = batch.len(),
            inserted = summary.inserted,
            closed = summary.closed,
            unchanged = summary.unchanged,
            "customer dimension merged"
        );
        Ok(None)
    }
}
