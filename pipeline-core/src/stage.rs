//! Staged customer files.
//!
//! The upstream extractor drops one `customers_<date>.csv` per day into the
//! stage directory: plain comma-separated lines, no header, no quoting, four
//! positional columns `(customer_id, name, email, phone)`.

use std::path::{Path, PathBuf};

use crate::dates::{staged_file_name, ExecutionDate};
use crate::error::{PipelineError, Result};

/// One raw customer record from a staged file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerRecord {
    pub customer_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Full path of the staged file for a given date.
pub fn staged_path(stage_dir: &Path, date: ExecutionDate) -> PathBuf {
    stage_dir.join(staged_file_name(date))
}

/// Read and parse a staged customer file.
///
/// Any malformed line fails the whole file; the merge is all-or-nothing, so
/// there is no point handing a partial batch to the warehouse.
pub fn read_staged_customers(path: &Path) -> Result<Vec<CustomerRecord>> {
    if !path.exists() {
        return Err(PipelineError::StagedFileMissing(path.to_path_buf()));
    }
    let raw = std::fs::read_to_string(path).map_err(|source| PipelineError::StagedFileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let mut records = Vec::new();
    for (index, line) in raw.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        records.push(parse_line(path, index + 1, line)?);
    }
    Ok(records)
}

fn parse_line(path: &Path, line_no: usize, line: &str) -> Result<CustomerRecord> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != 4 {
        return Err(PipelineError::MalformedRecord {
            path: path.to_path_buf(),
            line: line_no,
            reason: format!("expected 4 fields, got {}", fields.len()),
        });
    }
    if fields[0].is_empty() {
        return Err(PipelineError::MalformedRecord {
            path: path.to_path_buf(),
            line: line_no,
            reason: "empty customer_id".to_string(),
        });
    }
    Ok(CustomerRecord {
        customer_id: fields[0].to_string(),
        name: fields[1].to_string(),
        email: fields[2].to_string(),
        phone: fields[3].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "{contents}").unwrap();
        path
    }

    #[test]
    fn staged_path_follows_naming_convention() {
        let date = ExecutionDate::parse("20240802").unwrap();
        assert_eq!(
            staged_path(Path::new("/stage"), date),
            PathBuf::from("/stage/customers_20240802.csv")
        );
    }

    #[test]
    fn parses_positional_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "customers_20240802.csv",
            "C001,Alice,alice@example.com,555-0100\n\
             C002, Bob ,bob@example.com,555-0101\n\n",
        );

        let records = read_staged_customers(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].customer_id, "C001");
        // Fields are trimmed.
        assert_eq!(records[1].name, "Bob");
    }

    #[test]
    fn wrong_field_count_reports_line_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "customers.csv",
            "C001,Alice,alice@example.com,555-0100\nC002,Bob\n",
        );

        let err = read_staged_customers(&path).unwrap_err();
        match err {
            PipelineError::MalformedRecord { line, reason, .. } => {
                assert_eq!(line, 2);
                assert!(reason.contains("got 2"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_file_is_its_own_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_staged_customers(&dir.path().join("customers_19990101.csv")).unwrap_err();
        assert!(matches!(err, PipelineError::StagedFileMissing(_)));
    }
}
