//! The car rental pipeline topology.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::config::Settings;
use crate::dates::DATE_TOKEN_FORMAT;
use crate::tasks::{CustomerMergeTask, ExecutionDateTask, SparkSubmitTask, Task};
use crate::warehouse::Warehouse;

pub const PIPELINE_NAME: &str = "car_rental_data_pipeline";

/// An ordered pipeline; tasks execute strictly in sequence.
pub struct Pipeline {
    pub name: String,
    pub tasks: Vec<Box<dyn Task>>,
}

/// Parameters supplied when a run is triggered.
#[derive(Debug, Clone)]
pub struct RunParams {
    /// Scheduled/triggered run date; source of the default `yyyymmdd` token.
    pub run_date: NaiveDate,
    /// Optional `execution_date` trigger parameter (`"NA"` means unset).
    pub execution_date: Option<String>,
}

impl RunParams {
    pub fn default_token(&self) -> String {
        self.run_date.format(DATE_TOKEN_FORMAT).to_string()
    }
}

/// Wire the three-task car rental pipeline:
/// resolve date -> merge customer dimension -> submit spark job.
pub fn car_rental_pipeline(
    settings: &Settings,
    warehouse: Arc<dyn Warehouse>,
    params: &RunParams,
) -> Pipeline {
    Pipeline {
        name: PIPELINE_NAME.to_string(),
        tasks: vec![
            Box::new(ExecutionDateTask::new(
                params.default_token(),
                params.execution_date.clone(),
            )),
            Box::new(CustomerMergeTask::new(
                settings.stage_dir.clone(),
                warehouse,
            )),
            Box::new(SparkSubmitTask::new(settings.spark.clone())),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_token_has_no_separators() {
        let params = RunParams {
            run_date: NaiveDate::from_ymd_opt(2024, 8, 2).unwrap(),
            execution_date: None,
        };
        assert_eq!(params.default_token(), "20240802");
    }
}
