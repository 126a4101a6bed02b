//! Checkpoint command - database dumps from the command line.

use crate::cli::args::{CheckpointAction, CheckpointArgs};
use crate::config::Config;
use crate::domain::checkpoint::format_file_size;
use crate::domain::CheckpointInput;
use crate::errors::{AppError, AppResult};

use super::connect_services;

/// Execute the checkpoint command
pub async fn execute(args: CheckpointArgs, config: Config) -> AppResult<()> {
    let services = connect_services(&config).await?;
    let checkpoints = services.checkpoints;

    match args.action {
        CheckpointAction::Create { name, description } => {
            let checkpoint = checkpoints
                .create(CheckpointInput { name, description }, Some("cli".to_string()))
                .await?;
            println!(
                "Created checkpoint #{} '{}' ({})",
                checkpoint.id,
                checkpoint.checkpoint_name,
                checkpoint
                    .file_size
                    .map(format_file_size)
                    .unwrap_or_else(|| "size unknown".to_string())
            );
        }
        CheckpointAction::List => {
            let list = checkpoints.list().await?;
            if list.is_empty() {
                println!("No checkpoints");
            }
            for cp in list {
                println!(
                    "{:>4}  {}  {:<30}  {:>10}  {}",
                    cp.id,
                    cp.created_at.format("%Y-%m-%d %H:%M:%S"),
                    cp.checkpoint_name,
                    cp.file_size.map(format_file_size).unwrap_or_default(),
                    cp.file_name
                );
            }
        }
        CheckpointAction::Restore { id, yes } => {
            if !yes {
                return Err(AppError::validation(
                    "Restoring overwrites the database; pass --yes to continue",
                ));
            }
            tracing::warn!(checkpoint_id = id, "Restoring checkpoint from the CLI");
            let checkpoint = checkpoints.restore(id).await?;
            println!("Database restored from '{}'", checkpoint.checkpoint_name);
        }
        CheckpointAction::Delete { id } => {
            checkpoints.delete(id).await?;
            println!("Checkpoint #{} deleted", id);
        }
        CheckpointAction::Prune => {
            let removed = checkpoints.prune().await?;
            println!(
                "Removed {} checkpoint(s), keeping at most {}",
                removed, config.max_checkpoints
            );
        }
    }

    Ok(())
}
