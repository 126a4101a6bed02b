//! Application state shared by every handler.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Database, MediaStore, SessionStore};
use crate::services::{ServiceContainer, Services};

#[derive(Clone)]
pub struct AppState {
    pub services: Arc<dyn ServiceContainer>,
    /// Sessions and rate-limit counters
    pub sessions: Arc<dyn SessionStore>,
    pub config: Arc<Config>,
    pub media: MediaStore,
    pub database: Database,
}

impl AppState {
    /// Wire the real services over `database`.
    pub fn from_config(
        database: Database,
        sessions: Arc<dyn SessionStore>,
        config: Config,
        tool: Arc<dyn crate::infra::DumpTool>,
    ) -> Self {
        let media = MediaStore::new(config.media_dir.clone());
        let services = Services::from_connection(
            database.get_connection(),
            &config,
            media.clone(),
            tool,
        );

        Self::new(Arc::new(services), sessions, config, database)
    }

    /// Build from an existing container; router tests pass fakes here.
    pub fn new(
        services: Arc<dyn ServiceContainer>,
        sessions: Arc<dyn SessionStore>,
        config: Config,
        database: Database,
    ) -> Self {
        Self {
            services,
            sessions,
            media: MediaStore::new(config.media_dir.clone()),
            config: Arc::new(config),
            database,
        }
    }
}
