//! JSON API handlers.

pub mod auth_handler;
pub mod family_handler;
pub mod inventory_handler;
pub mod product_handler;

pub use auth_handler::auth_routes;
pub use family_handler::{admin_family_routes, public_family_routes};
pub use inventory_handler::inventory_routes;
pub use product_handler::{admin_product_routes, public_product_routes};
