//! Migration: Create inventory ledger table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(InventoryTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InventoryTransactions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(InventoryTransactions::ProductId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InventoryTransactions::TransactionType)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InventoryTransactions::Quantity)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InventoryTransactions::UnitPrice)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(InventoryTransactions::TotalAmount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(InventoryTransactions::Notes).text().null())
                    .col(
                        ColumnDef::new(InventoryTransactions::CreatedBy)
                            .string_len(50)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(InventoryTransactions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventory_transactions_product")
                            .from(
                                InventoryTransactions::Table,
                                InventoryTransactions::ProductId,
                            )
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_inventory_transactions_product_created")
                    .table(InventoryTransactions::Table)
                    .col(InventoryTransactions::ProductId)
                    .col(InventoryTransactions::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InventoryTransactions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum InventoryTransactions {
    Table,
    Id,
    ProductId,
    TransactionType,
    Quantity,
    UnitPrice,
    TotalAmount,
    Notes,
    CreatedBy,
    CreatedAt,
}

#[derive(Iden)]
enum Products {
    Table,
    Id,
}
