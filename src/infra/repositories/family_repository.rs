//! Product family repository.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use super::entities::family::{self, ActiveModel, Entity as FamilyEntity};
use super::entities::product;
use crate::domain::{Family, FamilyInput, FamilyWithCount};
use crate::errors::{AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait FamilyRepository: Send + Sync {
    /// All families ordered by name
    async fn list(&self) -> AppResult<Vec<Family>>;

    /// All families ordered by name, with how many products each one has
    async fn list_with_counts(&self) -> AppResult<Vec<FamilyWithCount>>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Family>>;

    async fn find_by_code(&self, code: &str) -> AppResult<Option<Family>>;

    async fn create(&self, input: FamilyInput) -> AppResult<Family>;

    async fn update(&self, id: i32, input: FamilyInput) -> AppResult<Family>;

    async fn delete(&self, id: i32) -> AppResult<()>;

    async fn count(&self) -> AppResult<u64>;

    /// Products (active or not) that reference the family
    async fn product_count(&self, id: i32) -> AppResult<u64>;
}

pub struct FamilyStore {
    db: Arc<DatabaseConnection>,
}

impl FamilyStore {
    pub fn new(db: impl Into<Arc<DatabaseConnection>>) -> Self {
        Self { db: db.into() }
    }
}

#[async_trait]
impl FamilyRepository for FamilyStore {
    async fn list(&self) -> AppResult<Vec<Family>> {
        let models = FamilyEntity::find()
            .order_by_asc(family::Column::Name)
            .all(self.db.as_ref())
            .await?;
        Ok(models.into_iter().map(Family::from).collect())
    }

    async fn list_with_counts(&self) -> AppResult<Vec<FamilyWithCount>> {
        let families = self.list().await?;

        let counts: HashMap<i32, i64> = product::Entity::find()
            .select_only()
            .column(product::Column::FamilyId)
            .column_as(Expr::col(product::Column::Id).count(), "product_count")
            .group_by(product::Column::FamilyId)
            .into_tuple::<(i32, i64)>()
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .collect();

        Ok(families
            .into_iter()
            .map(|family| {
                let product_count = counts.get(&family.id).copied().unwrap_or(0).max(0) as u64;
                FamilyWithCount {
                    family,
                    product_count,
                }
            })
            .collect())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Family>> {
        let result = FamilyEntity::find_by_id(id).one(self.db.as_ref()).await?;
        Ok(result.map(Family::from))
    }

    async fn find_by_code(&self, code: &str) -> AppResult<Option<Family>> {
        let result = FamilyEntity::find()
            .filter(family::Column::Code.eq(code))
            .one(self.db.as_ref())
            .await?;
        Ok(result.map(Family::from))
    }

    async fn create(&self, input: FamilyInput) -> AppResult<Family> {
        let now = Utc::now();
        let model = ActiveModel {
            code: Set(input.code),
            name: Set(input.name),
            description: Set(input.description),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await?;
        Ok(Family::from(model))
    }

    async fn update(&self, id: i32, input: FamilyInput) -> AppResult<Family> {
        let existing = FamilyEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or_not_found("Family")?;

        let mut active: ActiveModel = existing.into();
        active.code = Set(input.code);
        active.name = Set(input.name);
        active.description = Set(input.description);
        active.updated_at = Set(Utc::now());

        let model = active.update(self.db.as_ref()).await?;
        Ok(Family::from(model))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = FamilyEntity::delete_by_id(id).exec(self.db.as_ref()).await?;
        if result.rows_affected == 0 {
            return Err(crate::errors::AppError::not_found("Family"));
        }
        Ok(())
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(FamilyEntity::find().count(self.db.as_ref()).await?)
    }

    async fn product_count(&self, id: i32) -> AppResult<u64> {
        Ok(product::Entity::find()
            .filter(product::Column::FamilyId.eq(id))
            .count(self.db.as_ref())
            .await?)
    }
}
