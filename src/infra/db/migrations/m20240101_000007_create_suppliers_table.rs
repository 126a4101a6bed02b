//! Migration: Create suppliers table with soft delete.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Suppliers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Suppliers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Suppliers::Name).string_len(200).not_null())
                    .col(ColumnDef::new(Suppliers::ContactPerson).string_len(200).null())
                    .col(ColumnDef::new(Suppliers::Email).string_len(255).null())
                    .col(ColumnDef::new(Suppliers::Phone).string_len(50).null())
                    .col(ColumnDef::new(Suppliers::TaxNumber).string_len(50).null())
                    .col(ColumnDef::new(Suppliers::Address).text().null())
                    .col(ColumnDef::new(Suppliers::Website).string_len(255).null())
                    .col(ColumnDef::new(Suppliers::Notes).text().null())
                    .col(
                        ColumnDef::new(Suppliers::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Suppliers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Suppliers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Suppliers::DeletedAt).timestamp_with_time_zone().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_suppliers_deleted_at")
                    .table(Suppliers::Table)
                    .col(Suppliers::DeletedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Suppliers::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Suppliers {
    Table,
    Id,
    Name,
    ContactPerson,
    Email,
    Phone,
    TaxNumber,
    Address,
    Website,
    Notes,
    IsActive,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
