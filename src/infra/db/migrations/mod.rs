//! Database migrations.
//!
//! Each migration is a separate module following SeaORM conventions.
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20240101_000001_create_users_table;
mod m20240101_000002_create_product_families_table;
mod m20240101_000003_create_products_table;
mod m20240101_000004_create_product_images_table;
mod m20240101_000005_create_inventory_transactions_table;
mod m20240101_000006_create_customers_table;
mod m20240101_000007_create_suppliers_table;
mod m20240101_000008_create_checkpoints_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users_table::Migration),
            Box::new(m20240101_000002_create_product_families_table::Migration),
            Box::new(m20240101_000003_create_products_table::Migration),
            Box::new(m20240101_000004_create_product_images_table::Migration),
            Box::new(m20240101_000005_create_inventory_transactions_table::Migration),
            Box::new(m20240101_000006_create_customers_table::Migration),
            Box::new(m20240101_000007_create_suppliers_table::Migration),
            Box::new(m20240101_000008_create_checkpoints_table::Migration),
        ]
    }
}
