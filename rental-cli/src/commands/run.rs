use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use clap::Args;
use color_eyre::Result;

use pipeline_core::config::{Settings, TaskDefaults};
use pipeline_core::context::RunContext;
use pipeline_core::executor::PipelineExecutor;
use pipeline_core::models::{progress_channel, ExecutionEvent, RunStatus, TaskStatus};
use pipeline_core::pipeline::{car_rental_pipeline, RunParams};
use pipeline_core::warehouse::SqliteWarehouse;

use crate::output;

/// Trigger a run of the car rental data pipeline
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Execution date override in yyyymmdd format ("NA" means unset)
    #[arg(long, value_name = "YYYYMMDD")]
    pub execution_date: Option<String>,

    /// Path to the pipeline settings file
    #[arg(long, short = 'c', value_name = "FILE", default_value = "pipeline.yaml")]
    pub config: PathBuf,

    /// Override the staged-file directory from the settings file
    #[arg(long, value_name = "DIR")]
    pub stage_dir: Option<PathBuf>,

    /// Override the warehouse database file from the settings file
    #[arg(long, value_name = "FILE")]
    pub warehouse: Option<PathBuf>,
}

/// Apply command-line overrides on top of the loaded settings.
fn apply_overrides(settings: &mut Settings, args: &RunArgs) {
    if let Some(dir) = &args.stage_dir {
        settings.stage_dir = dir.clone();
    }
    if let Some(database) = &args.warehouse {
        settings.warehouse.database = database.clone();
    }
}

pub async fn execute(args: RunArgs) -> Result<()> {
    let mut settings = Settings::from_file(&args.config)?;
    apply_overrides(&mut settings, &args);

    let warehouse = Arc::new(
        SqliteWarehouse::open(&settings.warehouse.database, settings.warehouse.conn_id.clone())
            .await?,
    );

    let params = RunParams {
        run_date: Local::now().date_naive(),
        execution_date: args.execution_date,
    };

    let pipeline = car_rental_pipeline(&settings, warehouse, &params);
    output::info(&format!(
        "Pipeline '{}': {} tasks, default date token {}",
        pipeline.name,
        pipeline.tasks.len(),
        params.default_token()
    ));

    let (tx, mut rx) = progress_channel();
    let executor = PipelineExecutor::new(TaskDefaults::default()).with_progress(tx);

    let handle = tokio::spawn(async move { executor.execute(pipeline, RunContext::new()).await });

    let mut total_tasks = 0;
    while let Some(event) = rx.recv().await {
        match event {
            ExecutionEvent::PipelineStarted {
                pipeline_name,
                total_tasks: total,
            } => {
                total_tasks = total;
                eprintln!("==> Pipeline started: {pipeline_name}\n");
            }
            ExecutionEvent::TaskStarted {
                task_id,
                task_index,
                attempt,
            } => {
                let label = if attempt > 1 {
                    format!("{task_id} (attempt {attempt})")
                } else {
                    task_id
                };
                output::status(
                    "Running",
                    &format!("[{}/{}] {}", task_index + 1, total_tasks, label),
                );
            }
            ExecutionEvent::TaskRetrying {
                task_id,
                attempt,
                delay,
                error,
            } => {
                output::warning(&format!(
                    "{task_id} failed on attempt {attempt}, retrying in {}s: {error}",
                    delay.as_secs()
                ));
            }
            ExecutionEvent::TaskCompleted { result, .. } => match result.status {
                TaskStatus::Succeeded => output::success(&format!(
                    "{} ({}ms)",
                    result.task_id,
                    result.duration.as_millis()
                )),
                TaskStatus::Failed => output::failure(&format!(
                    "{}: {}",
                    result.task_id,
                    result.error.as_deref().unwrap_or("unknown error")
                )),
                TaskStatus::Pending => {
                    output::dim(&format!("    blocked: {}", result.task_id))
                }
                TaskStatus::Running => {}
            },
            ExecutionEvent::PipelineCompleted {
                status,
                succeeded_tasks,
                blocked_tasks,
            } => {
                eprintln!();
                match status {
                    RunStatus::Succeeded => {
                        output::success(&format!("Pipeline succeeded ({succeeded_tasks} tasks)"))
                    }
                    RunStatus::Failed => output::failure(&format!(
                        "Pipeline failed ({succeeded_tasks} succeeded, {blocked_tasks} blocked)"
                    )),
                }
            }
        }
    }

    let result = handle.await?;
    if !result.succeeded() {
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pipeline_core::config::{SparkSettings, WarehouseSettings};

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        args: RunArgs,
    }

    fn base_settings() -> Settings {
        Settings {
            stage_dir: PathBuf::from("/data/stage"),
            warehouse: WarehouseSettings::default(),
            spark: SparkSettings::default(),
        }
    }

    #[test]
    fn warehouse_flag_overrides_database_path() {
        let cli = TestCli::parse_from(["rental", "--warehouse", "/tmp/adhoc.db"]);
        let mut settings = base_settings();
        apply_overrides(&mut settings, &cli.args);

        assert_eq!(settings.warehouse.database, PathBuf::from("/tmp/adhoc.db"));
        // The connection id still comes from the settings file.
        assert_eq!(settings.warehouse.conn_id, "warehouse_conn");
    }

    #[test]
    fn stage_dir_flag_overrides_stage_dir() {
        let cli = TestCli::parse_from(["rental", "--stage-dir", "/tmp/stage"]);
        let mut settings = base_settings();
        apply_overrides(&mut settings, &cli.args);

        assert_eq!(settings.stage_dir, PathBuf::from("/tmp/stage"));
        assert_eq!(settings.warehouse.database, PathBuf::from("car_rental.db"));
    }

    #[test]
    fn no_flags_leave_settings_untouched() {
        let cli = TestCli::parse_from(["rental"]);
        let mut settings = base_settings();
        apply_overrides(&mut settings, &cli.args);

        assert_eq!(settings.stage_dir, PathBuf::from("/data/stage"));
        assert_eq!(settings.warehouse.database, PathBuf::from("car_rental.db"));
    }
}
