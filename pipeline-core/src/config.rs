//! Pipeline configuration: shared task defaults and run settings.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{PipelineError, Result};

/// Defaults applied uniformly to every task in the pipeline.
///
/// These replace the orchestrator-style ambient `default_args`: the executor
/// receives this struct explicitly instead of reading global state.
///
/// `depends_on_past` and the email flags record the pipeline's policy but
/// are not consumed anywhere: there is no notification wiring, and runs do
/// not depend on earlier runs. The executor reads only `owner`, `retries`,
/// and `retry_delay`.
#[derive(Debug, Clone)]
pub struct TaskDefaults {
    pub owner: String,
    pub depends_on_past: bool,
    pub email_on_failure: bool,
    pub email_on_retry: bool,
    /// Extra attempts after the first failure.
    pub retries: u32,
    pub retry_delay: Duration,
}

impl Default for TaskDefaults {
    fn default() -> Self {
        Self {
            owner: "data-platform".to_string(),
            depends_on_past: false,
            email_on_failure: false,
            email_on_retry: false,
            retries: 1,
            retry_delay: Duration::from_secs(300),
        }
    }
}

/// Run settings loaded from a YAML file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Directory holding the staged `customers_<date>.csv` files.
    pub stage_dir: PathBuf,
    #[serde(default)]
    pub warehouse: WarehouseSettings,
    #[serde(default)]
    pub spark: SparkSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WarehouseSettings {
    /// Named connection identifier for the dimension store.
    pub conn_id: String,
    /// Database file backing the store.
    pub database: PathBuf,
}

impl Default for WarehouseSettings {
    fn default() -> Self {
        Self {
            conn_id: "warehouse_conn".to_string(),
            database: PathBuf::from("car_rental.db"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SparkSettings {
    /// Named connection identifier for the job engine.
    pub conn_id: String,
    /// Submit binary used to launch the application.
    pub submit_bin: String,
    /// Path to the Spark application to submit.
    pub application: PathBuf,
}

impl Default for SparkSettings {
    fn default() -> Self {
        Self {
            conn_id: "spark_conn".to_string(),
            submit_bin: "spark-submit".to_string(),
            application: PathBuf::from("./jobs/spark_job.py"),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| PipelineError::SettingsRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| PipelineError::SettingsParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_pipeline_policy() {
        let defaults = TaskDefaults::default();
        assert_eq!(defaults.retries, 1);
        assert_eq!(defaults.retry_delay, Duration::from_secs(300));
        assert!(!defaults.email_on_failure);
        assert!(!defaults.email_on_retry);
        assert!(!defaults.depends_on_past);
    }

    #[test]
    fn settings_fill_missing_sections_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "stage_dir: /data/stage").unwrap();

        let settings = Settings::from_file(&path).unwrap();
        assert_eq!(settings.stage_dir, PathBuf::from("/data/stage"));
        assert_eq!(settings.warehouse.conn_id, "warehouse_conn");
        assert_eq!(settings.spark.conn_id, "spark_conn");
        assert_eq!(settings.spark.submit_bin, "spark-submit");
        assert_eq!(settings.spark.application, PathBuf::from("./jobs/spark_job.py"));
    }

    #[test]
    fn settings_reject_unknown_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "stage_dir: /data/stage").unwrap();
        writeln!(file, "notifications: nope").unwrap();

        assert!(matches!(
            Settings::from_file(&path),
            Err(PipelineError::SettingsParse { .. })
        ));
    }

    #[test]
    fn missing_settings_file_is_a_read_error() {
        assert!(matches!(
            Settings::from_file(Path::new("/nonexistent/pipeline.yaml")),
            Err(PipelineError::SettingsRead { .. })
        ));
    }
}
