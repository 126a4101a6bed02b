//! Product entity. Prices are stored in cents.

use sea_orm::entity::prelude::*;

use crate::domain::{Money, Product};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub reference: String,
    pub family_id: i32,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub sale_price: i64,
    pub purchase_price: i64,
    pub current_stock: i32,
    pub total_sold: i32,
    pub style: Option<String>,
    pub material: Option<String>,
    pub weight: Option<f64>,
    pub dimensions: Option<String>,
    pub is_active: bool,
    pub featured: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::family::Entity",
        from = "Column::FamilyId",
        to = "super::family::Column::Id"
    )]
    Family,
    #[sea_orm(has_many = "super::product_image::Entity")]
    Images,
    #[sea_orm(has_many = "super::inventory_transaction::Entity")]
    Transactions,
}

impl Related<super::family::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Family.def()
    }
}

impl Related<super::product_image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Images.def()
    }
}

impl Related<super::inventory_transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Product {
    fn from(model: Model) -> Self {
        Product {
            id: model.id,
            reference: model.reference,
            family_id: model.family_id,
            name: model.name,
            description: model.description,
            sale_price: Money::from_cents(model.sale_price),
            purchase_price: Money::from_cents(model.purchase_price),
            current_stock: model.current_stock,
            total_sold: model.total_sold,
            style: model.style,
            material: model.material,
            weight: model.weight,
            dimensions: model.dimensions,
            is_active: model.is_active,
            featured: model.featured,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
