// Car Rental Pipeline Core
// Pipeline definition and execution for the customer dimension load

pub mod config;
pub mod context;
pub mod dates;
pub mod error;
pub mod executor;
pub mod models;
pub mod pipeline;
pub mod stage;
pub mod tasks;
pub mod warehouse;

// Re-export commonly used types
pub use error::{PipelineError, Result};

pub use config::{Settings, SparkSettings, TaskDefaults, WarehouseSettings};
pub use context::RunContext;
pub use dates::ExecutionDate;
pub use executor::PipelineExecutor;
pub use models::{
    progress_channel, ExecutionEvent, ProgressReceiver, ProgressSender, RunResult, RunStatus,
    TaskResult, TaskStatus,
};
pub use pipeline::{car_rental_pipeline, Pipeline, RunParams, PIPELINE_NAME};
pub use stage::CustomerRecord;
pub use tasks::{CustomerMergeTask, ExecutionDateTask, SparkSubmitTask, Task};
pub use warehouse::{CustomerVersion, MergeSummary, SqliteWarehouse, Warehouse};
