//! Domain layer - Core business entities and logic
//!
//! Catalog entities, the inventory ledger rules and the value objects they
//! share. Nothing here touches the database or HTTP.

pub mod checkpoint;
pub mod contact;
pub mod dashboard;
pub mod family;
pub mod import;
pub mod inventory;
pub mod money;
pub mod password;
pub mod product;
pub mod session;
pub mod user;

pub use checkpoint::{Checkpoint, CheckpointInput, NewCheckpoint};
pub use contact::{
    ContactFilter, ContactScope, Customer, CustomerInput, Supplier, SupplierInput,
};
pub use dashboard::{Dashboard, DashboardStats};
pub use family::{Family, FamilyInput, FamilyWithCount};
pub use import::{ImportIssue, ImportReport, ImportRow};
pub use inventory::{
    InventoryOverview, InventoryTransaction, MovementOutcome, PlannedMovement, StockDrift, StockMovement,
    TransactionFilter, TransactionType, TransactionWithProduct,
};
pub use money::Money;
pub use password::Password;
pub use product::{
    NewProduct, NewProductImage, Product, ProductDetail, ProductFilter, ProductImage,
    ProductInput, ProductSort, ProductSummary, SortOrder, StockStatus,
};
pub use session::{Flash, FlashKind, Session};
pub use user::{NewUser, SessionUser, User, UserRole};
