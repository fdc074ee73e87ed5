//! Warehouse seam for the customer dimension.
//!
//! The pipeline only ever talks to the dimension store through this trait,
//! addressed by a named connection id the way the external engine would be.

pub mod sqlite;

pub use sqlite::SqliteWarehouse;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::stage::CustomerRecord;

/// One version row of the customer dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerVersion {
    pub customer_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub effective_date: DateTime<Utc>,
    /// `None` while the version is current.
    pub end_date: Option<DateTime<Utc>>,
    pub is_current: bool,
}

/// Row counts from one merge pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub inserted: usize,
    pub closed: usize,
    pub unchanged: usize,
}

#[async_trait]
pub trait Warehouse: Send + Sync {
    /// Connection identifier this handle is bound to.
    fn conn_id(&self) -> &str;

    /// Apply one staged batch to `customer_dim` as a single atomic merge.
    ///
    /// Semantics per record:
    /// - no current row for the id: insert a new current version with
    ///   `effective_date = merge_ts`;
    /// - current row with identical tracked attributes: no-op;
    /// - current row with any differing attribute: close it
    ///   (`end_date = merge_ts`, `is_current = false`). The replacement
    ///   version is not inserted in this pass; once closed, the id no longer
    ///   matches a current row, so the next load that carries it takes the
    ///   insert branch.
    async fn merge_customer_dim(
        &self,
        batch: &[CustomerRecord],
        merge_ts: DateTime<Utc>,
    ) -> Result<MergeSummary>;

    /// Current version for a customer, if one exists.
    async fn current_version(&self, customer_id: &str) -> Result<Option<CustomerVersion>>;

    /// Full version history for a customer, oldest first.
    async fn history(&self, customer_id: &str) -> Result<Vec<CustomerVersion>>;
}
