//! Execution date tokens and the templated arguments built from them.
//!
//! The resolver hands raw tokens around verbatim; everything that turns a
//! token into a file name or a job argument goes through [`ExecutionDate`],
//! so a malformed override fails at the formatting boundary instead of being
//! spliced into a path.

use std::fmt;

use chrono::NaiveDate;

use crate::error::{PipelineError, Result};

/// Token format used throughout the pipeline: `yyyymmdd`, no separators.
pub const DATE_TOKEN_FORMAT: &str = "%Y%m%d";

/// A validated execution date token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionDate(NaiveDate);

impl ExecutionDate {
    /// Parse a `yyyymmdd` token.
    pub fn parse(token: &str) -> Result<Self> {
        NaiveDate::parse_from_str(token, DATE_TOKEN_FORMAT)
            .map(Self)
            .map_err(|_| PipelineError::InvalidDate(token.to_string()))
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for ExecutionDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_TOKEN_FORMAT))
    }
}

/// Name of the staged customer file for a given date.
pub fn staged_file_name(date: ExecutionDate) -> String {
    format!("customers_{date}.csv")
}

/// The single application argument passed to the submitted job.
pub fn date_argument(date: ExecutionDate) -> String {
    format!("--date={date}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_yyyymmdd() {
        let date = ExecutionDate::parse("20240802").unwrap();
        assert_eq!(date.to_string(), "20240802");
        assert_eq!(date.date(), NaiveDate::from_ymd_opt(2024, 8, 2).unwrap());
    }

    #[test]
    fn rejects_separators_and_garbage() {
        for token in ["2024-08-02", "NA", "", "20241345", "08022024x"] {
            let err = ExecutionDate::parse(token).unwrap_err();
            assert!(matches!(err, PipelineError::InvalidDate(_)), "{token}");
        }
    }

    #[test]
    fn staged_file_name_embeds_token() {
        let date = ExecutionDate::parse("20230101").unwrap();
        assert_eq!(staged_file_name(date), "customers_20230101.csv");
    }

    #[test]
    fn date_argument_uses_long_flag() {
        let date = ExecutionDate::parse("20240802").unwrap();
        assert_eq!(date_argument(date), "--date=20240802");
    }
}
