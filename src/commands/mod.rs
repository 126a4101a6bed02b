//! Commands module - CLI command implementations.
//!
//! Each command is implemented in its own module for separation of concerns.

pub mod admin;
pub mod checkpoint;
pub mod import;
pub mod migrate;
pub mod serve;
pub mod stock;

use std::sync::Arc;

use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{Database, MediaStore, MysqlTools};
use crate::services::Services;

/// Services over a database connection that leaves the schema alone.
pub(crate) async fn connect_services(config: &Config) -> AppResult<Services> {
    let db = Database::connect_without_migrations(config).await?;
    let tool = Arc::new(MysqlTools::from_config(config)?);
    Ok(Services::from_connection(
        db.get_connection(),
        config,
        MediaStore::new(config.media_dir.clone()),
        tool,
    ))
}
