//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod checkpoint;
pub mod customer;
pub mod family;
pub mod inventory_transaction;
pub mod product;
pub mod product_image;
pub mod supplier;
pub mod user;
