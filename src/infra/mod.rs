//! Infrastructure layer - External systems integration
//!
//! - MySQL connection, migrations and repositories
//! - Redis session and rate-limit storage
//! - Media files on disk
//! - `mysqldump` / `mysql` for checkpoints
//! - Unit of Work handing repositories to the services

pub mod cache;
pub mod db;
pub mod media;
pub mod repositories;
pub mod tools;
pub mod unit_of_work;

pub use cache::{Cache, MemoryStore, SessionStore};
pub use db::{Database, Migrator};
pub use media::MediaStore;
pub use repositories::{
    CheckpointRepository, CheckpointStore, CustomerRepository, CustomerStore, FamilyRepository,
    FamilyStore, InventoryRepository, InventoryStore, ProductRepository, ProductStore,
    SupplierRepository, SupplierStore, UserRepository, UserStore,
};
pub use tools::{DumpTool, MysqlTools};
pub use unit_of_work::{Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use cache::MockSessionStore;
#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockCheckpointRepository, MockCustomerRepository, MockFamilyRepository,
    MockInventoryRepository, MockProductRepository, MockSupplierRepository, MockUserRepository,
};
#[cfg(any(test, feature = "test-utils"))]
pub use tools::MockDumpTool;
#[cfg(any(test, feature = "test-utils"))]
pub use unit_of_work::MockUnitOfWork;
