//! Gonzaga's catalog - jewelry catalog and inventory back office
//!
//! A public product catalog with an optional site password, plus a
//! session-authenticated back office for products, families, the stock
//! ledger, customers, suppliers and database checkpoints. A JSON API with
//! OpenAPI docs exposes the catalog and inventory to other tools.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities and rules
//! - **services**: Use cases over the Unit of Work
//! - **infra**: Database, sessions, media files, dump tools
//! - **api**: HTML pages, JSON handlers, middleware and routes
//! - **types**: Shared types (pagination, responses)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Create the first administrator
//! cargo run -- admin create maria --password 'long passphrase' --role admin
//!
//! # Snapshot the database
//! cargo run -- checkpoint create --name "Before import"
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Money, Password, User, UserRole};
pub use errors::{AppError, AppResult};
pub use infra::{Cache, MemoryStore};
