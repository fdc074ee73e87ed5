//! Error type shared by every stage of the pipeline.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = PipelineError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("staged file not found: {0}")]
    StagedFileMissing(PathBuf),

    #[error("failed to read staged file {path}: {source}")]
    StagedFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A staged row that does not match the fixed positional layout.
    #[error("malformed record at {path}:{line}: {reason}")]
    MalformedRecord {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("invalid execution date token {0:?}: expected yyyymmdd")]
    InvalidDate(String),

    #[error("warehouse error: {0}")]
    Warehouse(#[from] tokio_rusqlite::Error),

    #[error("malformed timestamp in customer_dim: {0}")]
    TimestampDecode(String),

    #[error("job submission failed: {0}")]
    JobSubmit(String),

    /// A task tried to publish under an id that already holds a value.
    #[error("context value for {0:?} was already published")]
    DuplicateContextKey(String),

    #[error("no context value published for {0:?}")]
    MissingContextKey(String),

    #[error("failed to read settings {path}: {source}")]
    SettingsRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid settings {path}: {source}")]
    SettingsParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}
