//! Unit of Work: one place to get every repository.
//!
//! Multi-row writes (stock movements, product create/delete, image ordering)
//! open their own database transaction inside the store, so the unit of work
//! only hands out repositories.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::repositories::{
    CheckpointRepository, CheckpointStore, CustomerRepository, CustomerStore, FamilyRepository,
    FamilyStore, InventoryRepository, InventoryStore, ProductRepository, ProductStore,
    SupplierRepository, SupplierStore, UserRepository, UserStore,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Repository access for the services.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn families(&self) -> Arc<dyn FamilyRepository>;

    fn products(&self) -> Arc<dyn ProductRepository>;

    fn inventory(&self) -> Arc<dyn InventoryRepository>;

    fn customers(&self) -> Arc<dyn CustomerRepository>;

    fn suppliers(&self) -> Arc<dyn SupplierRepository>;

    fn checkpoints(&self) -> Arc<dyn CheckpointRepository>;
}

/// SeaORM-backed unit of work.
pub struct Persistence {
    users: Arc<UserStore>,
    families: Arc<FamilyStore>,
    products: Arc<ProductStore>,
    inventory: Arc<InventoryStore>,
    customers: Arc<CustomerStore>,
    suppliers: Arc<SupplierStore>,
    checkpoints: Arc<CheckpointStore>,
}

impl Persistence {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            users: Arc::new(UserStore::new(db.clone())),
            families: Arc::new(FamilyStore::new(db.clone())),
            products: Arc::new(ProductStore::new(db.clone())),
            inventory: Arc::new(InventoryStore::new(db.clone())),
            customers: Arc::new(CustomerStore::new(db.clone())),
            suppliers: Arc::new(SupplierStore::new(db.clone())),
            checkpoints: Arc::new(CheckpointStore::new(db)),
        }
    }
}

impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn families(&self) -> Arc<dyn FamilyRepository> {
        self.families.clone()
    }

    fn products(&self) -> Arc<dyn ProductRepository> {
        self.products.clone()
    }

    fn inventory(&self) -> Arc<dyn InventoryRepository> {
        self.inventory.clone()
    }

    fn customers(&self) -> Arc<dyn CustomerRepository> {
        self.customers.clone()
    }

    fn suppliers(&self) -> Arc<dyn SupplierRepository> {
        self.suppliers.clone()
    }

    fn checkpoints(&self) -> Arc<dyn CheckpointRepository> {
        self.checkpoints.clone()
    }
}
