//! Migration: Create checkpoint tracking table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Checkpoints::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Checkpoints::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Checkpoints::CheckpointName)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Checkpoints::Description).text().null())
                    .col(ColumnDef::new(Checkpoints::FileName).string_len(255).not_null())
                    .col(ColumnDef::new(Checkpoints::FileSize).big_integer().null())
                    .col(ColumnDef::new(Checkpoints::CreatedBy).string_len(50).null())
                    .col(
                        ColumnDef::new(Checkpoints::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Checkpoints::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Checkpoints {
    Table,
    Id,
    CheckpointName,
    Description,
    FileName,
    FileSize,
    CreatedBy,
    CreatedAt,
}
