//! CLI module - Command-line interface for the application.
//!
//! Provides commands for:
//! - `serve` - Start the HTTP server
//! - `migrate` - Database migrations
//! - `checkpoint` - Database dumps and restores
//! - `admin` - Back-office users
//! - `stock` - Ledger reconciliation

pub mod args;

pub use args::{Cli, Commands};
