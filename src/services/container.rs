//! Service container - one place the HTTP layer and the CLI get services from.
//!
//! Handlers depend on the [`ServiceContainer`] trait so router tests can swap
//! in fakes without a database.

use std::sync::Arc;

use super::{
    AuthService, Authenticator, CheckpointManager, CheckpointService, CustomerManager,
    CustomerService, DashboardManager, DashboardService, FamilyManager, FamilyService,
    ImportManager, ImportService, InventoryManager, InventoryService, ProductManager, ProductService, SupplierManager,
    SupplierService,
};
use crate::config::Config;
use crate::infra::{DumpTool, MediaStore, Persistence};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn products(&self) -> Arc<dyn ProductService>;

    fn families(&self) -> Arc<dyn FamilyService>;

    fn inventory(&self) -> Arc<dyn InventoryService>;

    fn customers(&self) -> Arc<dyn CustomerService>;

    fn suppliers(&self) -> Arc<dyn SupplierService>;

    fn checkpoints(&self) -> Arc<dyn CheckpointService>;

    fn dashboard(&self) -> Arc<dyn DashboardService>;
}

/// Concrete container holding every service behind `Arc<dyn ...>`.
#[derive(Clone)]
pub struct Services {
    pub auth: Arc<dyn AuthService>,
    pub products: Arc<dyn ProductService>,
    pub families: Arc<dyn FamilyService>,
    pub inventory: Arc<dyn InventoryService>,
    pub customers: Arc<dyn CustomerService>,
    pub suppliers: Arc<dyn SupplierService>,
    pub checkpoints: Arc<dyn CheckpointService>,
    pub dashboard: Arc<dyn DashboardService>,
    /// CLI only
    pub import: Arc<dyn ImportService>,
}

impl Services {
    /// Wire every service over one database connection
    pub fn from_connection(
        db: Arc<sea_orm::DatabaseConnection>,
        config: &Config,
        media: MediaStore,
        tool: Arc<dyn DumpTool>,
    ) -> Self {
        let uow = Arc::new(Persistence::new(db));

        Self {
            auth: Arc::new(Authenticator::new(uow.clone(), config.clone())),
            products: Arc::new(ProductManager::new(uow.clone(), media)),
            families: Arc::new(FamilyManager::new(uow.clone())),
            inventory: Arc::new(InventoryManager::new(uow.clone())),
            customers: Arc::new(CustomerManager::new(uow.clone())),
            suppliers: Arc::new(SupplierManager::new(uow.clone())),
            checkpoints: Arc::new(CheckpointManager::new(
                uow.clone(),
                tool,
                config.checkpoint_dir.clone(),
                config.max_checkpoints,
            )),
            dashboard: Arc::new(DashboardManager::new(uow.clone())),
            import: Arc::new(ImportManager::new(uow)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth.clone()
    }

    fn products(&self) -> Arc<dyn ProductService> {
        self.products.clone()
    }

    fn families(&self) -> Arc<dyn FamilyService> {
        self.families.clone()
    }

    fn inventory(&self) -> Arc<dyn InventoryService> {
        self.inventory.clone()
    }

    fn customers(&self) -> Arc<dyn CustomerService> {
        self.customers.clone()
    }

    fn suppliers(&self) -> Arc<dyn SupplierService> {
        self.suppliers.clone()
    }

    fn checkpoints(&self) -> Arc<dyn CheckpointService> {
        self.checkpoints.clone()
    }

    fn dashboard(&self) -> Arc<dyn DashboardService> {
        self.dashboard.clone()
    }
}
