//! SQLite-backed customer dimension store.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;

use crate::error::{PipelineError, Result};
use crate::stage::CustomerRecord;
use crate::warehouse::{CustomerVersion, MergeSummary, Warehouse};

/// Schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS customer_dim (
    customer_id    TEXT NOT NULL,
    name           TEXT NOT NULL,
    email          TEXT NOT NULL,
    phone          TEXT NOT NULL,
    effective_date TEXT NOT NULL,    -- RFC 3339 UTC
    end_date       TEXT,             -- NULL while the version is current
    is_current     INTEGER NOT NULL  -- 0 | 1
);

CREATE INDEX IF NOT EXISTS customer_dim_current_idx
    ON customer_dim(customer_id, is_current);
";

/// Customer dimension store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteWarehouse {
    conn: tokio_rusqlite::Connection,
    conn_id: String,
}

impl SqliteWarehouse {
    /// Open (or create) a store at `path` under the given connection id.
    pub async fn open(path: impl AsRef<Path>, conn_id: impl Into<String>) -> Result<Self> {
        let conn = tokio_rusqlite::Connection::open(path).await?;
        let store = Self {
            conn,
            conn_id: conn_id.into(),
        };
        store.init_schema().await?;
        Ok(store)
    }

    /// Open an in-memory store, useful for testing.
    pub async fn open_in_memory(conn_id: impl Into<String>) -> Result<Self> {
        let conn = tokio_rusqlite::Connection::open_in_memory().await?;
        let store = Self {
            conn,
            conn_id: conn_id.into(),
        };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<()> {
        self.conn
            .call(|conn| {
                conn.execute_batch(SCHEMA)?;
                Ok(())
            })
            .await?;
        Ok(())
    }
}

#[async_trait]
impl Warehouse for SqliteWarehouse {
    fn conn_id(&self) -> &str {
        &self.conn_id
    }

    async fn merge_customer_dim(
        &self,
        batch: &[CustomerRecord],
        merge_ts: DateTime<Utc>,
    ) -> Result<MergeSummary> {
        let batch = batch.to_vec();
        let ts = merge_ts.to_rfc3339();

        // One transaction for the whole batch keeps the merge all-or-nothing,
        // matching the single-statement atomicity of a warehouse MERGE.
        let summary = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                let mut summary = MergeSummary::default();

                for rec in &batch {
                    let current: Option<(String, String, String)> = tx
                        .query_row(
                            "SELECT name, email, phone FROM customer_dim
                             WHERE customer_id = ?1 AND is_current = 1",
                            rusqlite::params![rec.customer_id],
                            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
                        )
                        .optional()?;

                    match current {
                        Some((name, email, phone)) => {
                            if name != rec.name || email != rec.email || phone != rec.phone {
                                tx.execute(
                                    "UPDATE customer_dim
                                     SET end_date = ?2, is_current = 0
                                     WHERE customer_id = ?1 AND is_current = 1",
                                    rusqlite::params![rec.customer_id, ts],
                                )?;
                                summary.closed += 1;
                            } else {
                                summary.unchanged += 1;
                            }
                        }
                        None => {
                            tx.execute(
                                "INSERT INTO customer_dim
                                 (customer_id, name, email, phone,
                                  effective_date, end_date, is_current)
                                 VALUES (?1, ?2, ?3, ?4, ?5, NULL, 1)",
                                rusqlite::params![
                                    rec.customer_id,
                                    rec.name,
                                    rec.email,
                                    rec.phone,
                                    ts
                                ],
                            )?;
                            summary.inserted += 1;
                        }
                    }
                }

                tx.commit()?;
                Ok(summary)
            })
            .await?;

        Ok(summary)
    }

    async fn current_version(&self, customer_id: &str) -> Result<Option<CustomerVersion>> {
        let id = customer_id.to_string();
        let row: Option<RawVersion> = self
            .conn
            .call(move |conn| {
                conn.query_row(
                    "SELECT customer_id, name, email, phone,
                            effective_date, end_date, is_current
                     FROM customer_dim
                     WHERE customer_id = ?1 AND is_current = 1",
                    rusqlite::params![id],
                    raw_version,
                )
                .optional()
                .map_err(Into::into)
            })
            .await?;

        row.map(decode_version).transpose()
    }

    async fn history(&self, customer_id: &str) -> Result<Vec<CustomerVersion>> {
        let id = customer_id.to_string();
        let rows: Vec<RawVersion> = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT customer_id, name, email, phone,
                            effective_date, end_date, is_current
                     FROM customer_dim
                     WHERE customer_id = ?1
                     ORDER BY effective_date ASC",
                )?;
                let rows = stmt
                    .query_map(rusqlite::params![id], raw_version)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(rows)
            })
            .await?;

        rows.into_iter().map(decode_version).collect()
    }
}

type RawVersion = (String, String, String, String, String, Option<String>, bool);

fn raw_version(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawVersion> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
    ))
}

fn decode_version(raw: RawVersion) -> Result<CustomerVersion> {
    let (customer_id, name, email, phone, effective, end, is_current) = raw;
    Ok(CustomerVersion {
        customer_id,
        name,
        email,
        phone,
        effective_date: decode_ts(&effective)?,
        end_date: end.as_deref().map(decode_ts).transpose()?,
        is_current,
    })
}

fn decode_ts(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| PipelineError::TimestampDecode(raw.to_string()))
}
