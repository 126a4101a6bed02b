//! Checkpoint tracking entity.

use sea_orm::entity::prelude::*;

use crate::domain::Checkpoint;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "checkpoints")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub checkpoint_name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub file_name: String,
    pub file_size: Option<i64>,
    pub created_by: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Checkpoint {
    fn from(model: Model) -> Self {
        Checkpoint {
            id: model.id,
            checkpoint_name: model.checkpoint_name,
            description: model.description,
            file_name: model.file_name,
            file_size: model.file_size,
            created_by: model.created_by,
            created_at: model.created_at,
        }
    }
}
