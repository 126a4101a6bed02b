//! Import command - bulk catalog loads.

use crate::cli::args::{ImportAction, ImportArgs};
use crate::config::Config;
use crate::errors::AppResult;

use super::connect_services;

/// Execute the import command
pub async fn execute(args: ImportArgs, config: Config) -> AppResult<()> {
    match args.action {
        ImportAction::Products { file, user } => {
            let data = tokio::fs::read(&file).await?;
            let services = connect_services(&config).await?;

            tracing::info!(file = %file.display(), bytes = data.len(), "Importing products");
            let report = services.import.import_products(&data, Some(user)).await?;

            println!(
                "Created {}, updated {} ({} stock adjustment(s)), skipped {}",
                report.created,
                report.updated,
                report.stock_adjusted,
                report.skipped.len()
            );
            for issue in &report.skipped {
                println!("  line {:>5}  {:<20} {}", issue.line, issue.reference, issue.reason);
            }
        }
    }

    Ok(())
}
