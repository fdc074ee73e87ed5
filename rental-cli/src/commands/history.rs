use std::path::PathBuf;

use clap::Args;
use color_eyre::Result;

use pipeline_core::config::Settings;
use pipeline_core::warehouse::{SqliteWarehouse, Warehouse};

use crate::output;

/// Show the SCD2 version history of a customer
#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Customer id to inspect
    pub customer_id: String,

    /// Path to the pipeline settings file
    #[arg(long, short = 'c', value_name = "FILE", default_value = "pipeline.yaml")]
    pub config: PathBuf,
}

pub async fn execute(args: HistoryArgs) -> Result<()> {
    let settings = Settings::from_file(&args.config)?;
    let warehouse = SqliteWarehouse::open(
        &settings.warehouse.database,
        settings.warehouse.conn_id.clone(),
    )
    .await?;

    let versions = warehouse.history(&args.customer_id).await?;
    if versions.is_empty() {
        output::warning(&format!("no versions for customer {}", args.customer_id));
        return Ok(());
    }

    for version in &versions {
        let end = version
            .end_date
            .map(|d| d.to_rfc3339())
            .unwrap_or_else(|| "-".to_string());
        let marker = if version.is_current { "current" } else { "closed" };
        println!(
            "{:8} {} .. {:35} {} <{}> {}",
            marker,
            version.effective_date.to_rfc3339(),
            end,
            version.name,
            version.email,
            version.phone
        );
    }
    Ok(())
}
