//! Inventory ledger entity.

use sea_orm::entity::prelude::*;

use crate::domain::{InventoryTransaction, Money, TransactionType};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "inventory_transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub product_id: i32,
    pub transaction_type: String,
    pub quantity: i32,
    pub unit_price: i64,
    pub total_amount: i64,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub created_by: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for InventoryTransaction {
    fn from(model: Model) -> Self {
        let transaction_type = TransactionType::parse(&model.transaction_type).unwrap_or_else(|| {
            tracing::warn!(
                id = model.id,
                value = %model.transaction_type,
                "Unknown transaction type in ledger, treating as adjustment"
            );
            TransactionType::Adjustment
        });

        InventoryTransaction {
            id: model.id,
            product_id: model.product_id,
            transaction_type,
            quantity: model.quantity,
            unit_price: Money::from_cents(model.unit_price),
            total_amount: Money::from_cents(model.total_amount),
            notes: model.notes,
            created_by: model.created_by,
            created_at: model.created_at,
        }
    }
}
