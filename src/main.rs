//! Gonzaga's catalog - application entry point
//!
//! CLI-based entry point that dispatches to the commands.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gonzagas_catalog::{
    cli::{Cli, Commands},
    commands,
    config::Config,
    errors::AppResult,
};

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing (verbose mode sets debug level)
    init_tracing(cli.verbose);

    if let Err(e) = run(cli.command).await {
        tracing::error!("Command failed: {}", e);
        std::process::exit(1);
    }
}

async fn run(command: Commands) -> AppResult<()> {
    let config = Config::from_env()?;
    tracing::debug!(environment = %config.environment, "Configuration loaded");

    match command {
        Commands::Serve(args) => commands::serve::execute(args, config).await,
        Commands::Migrate(args) => commands::migrate::execute(args, config).await,
        Commands::Checkpoint(args) => commands::checkpoint::execute(args, config).await,
        Commands::Admin(args) => commands::admin::execute(args, config).await,
        Commands::Stock(args) => commands::stock::execute(args, config).await,
        Commands::Import(args) => commands::import::execute(args, config).await,
    }
}

/// Initialize tracing subscriber
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        "gonzagas_catalog=debug,tower_http=debug".to_string()
    } else {
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "gonzagas_catalog=info,tower_http=info".to_string())
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();
}
