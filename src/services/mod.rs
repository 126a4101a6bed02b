//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain rules and infrastructure. They reach
//! repositories through the Unit of Work and are handed to the HTTP layer
//! and the CLI through the [`ServiceContainer`].

mod auth_service;
mod checkpoint_service;
mod contact_service;
pub mod container;
mod dashboard_service;
mod family_service;
mod import_service;
mod inventory_service;
mod product_service;

pub use container::{ServiceContainer, Services};

pub use auth_service::{AuthService, Authenticator, Claims, TokenResponse};
pub use checkpoint_service::{CheckpointManager, CheckpointService};
pub use contact_service::{CustomerManager, CustomerService, SupplierManager, SupplierService};
pub use dashboard_service::{DashboardManager, DashboardService};
pub use family_service::{FamilyManager, FamilyService};
pub use import_service::{read_import_rows, ImportManager, ImportService};
pub use inventory_service::{InventoryManager, InventoryService};
pub use product_service::{ImageUpload, ProductManager, ProductService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
