//! Stock command - ledger maintenance.

use crate::cli::args::{StockAction, StockArgs};
use crate::config::Config;
use crate::errors::AppResult;

use super::connect_services;

/// Execute the stock command
pub async fn execute(args: StockArgs, config: Config) -> AppResult<()> {
    let services = connect_services(&config).await?;

    match args.action {
        StockAction::Reconcile { apply } => {
            let drift = services.inventory.reconcile(apply).await?;

            if drift.is_empty() {
                println!("Every product's stock matches its ledger");
                return Ok(());
            }

            println!("{:<20} {:>8} {:>8}", "reference", "stock", "ledger");
            for d in &drift {
                println!("{:<20} {:>8} {:>8}", d.reference, d.cached, d.derived);
            }

            if apply {
                tracing::info!(products = drift.len(), "Stock levels rewritten from the ledger");
                println!("Fixed {} product(s)", drift.len());
            } else {
                tracing::warn!(products = drift.len(), "Stock drift found");
                println!("Run with --apply to rewrite these stock levels");
            }
        }
    }

    Ok(())
}
