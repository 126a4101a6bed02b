//! Repository layer - Data access abstraction
//!
//! Each aggregate has a trait (mocked in tests) and a SeaORM-backed store.

mod base;
mod checkpoint_repository;
mod customer_repository;
pub(crate) mod entities;
mod family_repository;
mod inventory_repository;
mod product_repository;
mod supplier_repository;
mod user_repository;

pub use checkpoint_repository::{CheckpointRepository, CheckpointStore};
pub use customer_repository::{CustomerRepository, CustomerStore};
pub use family_repository::{FamilyRepository, FamilyStore};
pub use inventory_repository::{InventoryRepository, InventoryStore};
pub use product_repository::{ProductRepository, ProductStore};
pub use supplier_repository::{SupplierRepository, SupplierStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use checkpoint_repository::MockCheckpointRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use customer_repository::MockCustomerRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use family_repository::MockFamilyRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use inventory_repository::MockInventoryRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use product_repository::MockProductRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use supplier_repository::MockSupplierRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
