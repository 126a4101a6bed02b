//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::ROLE_STAFF;

/// Gonzaga's jewelry catalog and back office
#[derive(Parser, Debug)]
#[command(name = "gonzagas")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),

    /// Create, list, restore and prune database checkpoints
    Checkpoint(CheckpointArgs),

    /// Manage back-office users
    Admin(AdminArgs),

    /// Stock maintenance
    Stock(StockArgs),

    /// Bulk-load catalog data
    Import(ImportArgs),
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host to bind to (defaults to SERVER_HOST)
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Port to listen on (defaults to SERVER_PORT)
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

/// Migration actions
#[derive(Subcommand, Debug)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset and re-run all migrations
    Fresh,
}

/// Arguments for the checkpoint command
#[derive(Parser, Debug)]
pub struct CheckpointArgs {
    #[command(subcommand)]
    pub action: CheckpointAction,
}

#[derive(Subcommand, Debug)]
pub enum CheckpointAction {
    /// Dump the database into a new checkpoint
    Create {
        /// Display name (defaults to "Checkpoint <timestamp>")
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// List checkpoints, newest first
    List,
    /// Load a checkpoint back into the database
    Restore {
        id: i32,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Delete a checkpoint and its file
    Delete { id: i32 },
    /// Delete checkpoints beyond MAX_CHECKPOINTS
    Prune,
}

/// Arguments for the admin command
#[derive(Parser, Debug)]
pub struct AdminArgs {
    #[command(subcommand)]
    pub action: AdminAction,
}

#[derive(Subcommand, Debug)]
pub enum AdminAction {
    /// Create a back-office user
    Create {
        username: String,
        #[arg(short, long, env = "ADMIN_PASSWORD")]
        password: String,
        /// admin | staff
        #[arg(short, long, default_value = ROLE_STAFF)]
        role: String,
    },
    /// Set a new password for an existing user
    Password {
        username: String,
        #[arg(short, long, env = "ADMIN_PASSWORD")]
        password: String,
    },
}

/// Arguments for the stock command
#[derive(Parser, Debug)]
pub struct StockArgs {
    #[command(subcommand)]
    pub action: StockAction,
}

#[derive(Subcommand, Debug)]
pub enum StockAction {
    /// Compare every product's stock with its ledger
    Reconcile {
        /// Rewrite drifted stock levels
        #[arg(long)]
        apply: bool,
    },
}

/// Arguments for the import command
#[derive(Parser, Debug)]
pub struct ImportArgs {
    #[command(subcommand)]
    pub action: ImportAction,
}

#[derive(Subcommand, Debug)]
pub enum ImportAction {
    /// Create or update products from a CSV file with a header row
    Products {
        file: PathBuf,
        /// Recorded as the author of opening stock and adjustments
        #[arg(long, default_value = "import")]
        user: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_checkpoint_restore() {
        let cli = Cli::try_parse_from(["gonzagas", "checkpoint", "restore", "7", "--yes"]).unwrap();
        match cli.command {
            Commands::Checkpoint(CheckpointArgs {
                action: CheckpointAction::Restore { id, yes },
            }) => {
                assert_eq!(id, 7);
                assert!(yes);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_admin_create_defaults_to_staff() {
        let cli = Cli::try_parse_from([
            "gonzagas", "admin", "create", "joao", "--password", "long-enough",
        ])
        .unwrap();
        match cli.command {
            Commands::Admin(AdminArgs {
                action: AdminAction::Create { username, role, .. },
            }) => {
                assert_eq!(username, "joao");
                assert_eq!(role, "staff");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_import_products() {
        let cli = Cli::try_parse_from(["gonzagas", "import", "products", "stock.csv"]).unwrap();
        match cli.command {
            Commands::Import(ImportArgs {
                action: ImportAction::Products { file, user },
            }) => {
                assert_eq!(file, PathBuf::from("stock.csv"));
                assert_eq!(user, "import");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::try_parse_from(["gonzagas", "stock", "reconcile", "--apply", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Stock(StockArgs {
                action: StockAction::Reconcile { apply: true }
            })
        ));
    }
}
