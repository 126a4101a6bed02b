//! Supplier repository with soft delete.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Select, Set,
};

use super::base::{fetch_page, like_pattern};
use super::entities::supplier::{self, ActiveModel, Entity as SupplierEntity};
use crate::domain::{ContactFilter, ContactScope, Supplier, SupplierInput};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SupplierRepository: Send + Sync {
    async fn search(
        &self,
        filter: ContactFilter,
        params: PaginationParams,
    ) -> AppResult<(Vec<Supplier>, u64)>;

    /// Active, non-deleted suppliers by name (for pickers)
    async fn list_active(&self) -> AppResult<Vec<Supplier>>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Supplier>>;

    async fn find_by_id_with_deleted(&self, id: i32) -> AppResult<Option<Supplier>>;

    async fn create(&self, input: SupplierInput) -> AppResult<Supplier>;

    async fn update(&self, id: i32, input: SupplierInput) -> AppResult<Supplier>;

    async fn set_active(&self, id: i32, active: bool) -> AppResult<Supplier>;

    async fn soft_delete(&self, id: i32) -> AppResult<()>;

    async fn restore(&self, id: i32) -> AppResult<Supplier>;
}

pub struct SupplierStore {
    db: Arc<DatabaseConnection>,
}

impl SupplierStore {
    pub fn new(db: impl Into<Arc<DatabaseConnection>>) -> Self {
        Self { db: db.into() }
    }

    fn find_current() -> Select<SupplierEntity> {
        SupplierEntity::find().filter(supplier::Column::DeletedAt.is_null())
    }

    async fn current_model(&self, id: i32) -> AppResult<supplier::Model> {
        Self::find_current()
            .filter(supplier::Column::Id.eq(id))
            .one(self.db.as_ref())
            .await?
            .ok_or_not_found("Supplier")
    }
}

fn apply_input(active: &mut ActiveModel, input: SupplierInput) {
    active.is_active = Set(input.active());
    active.name = Set(input.name);
    active.contact_person = Set(input.contact_person);
    active.email = Set(input.email);
    active.phone = Set(input.phone);
    active.tax_number = Set(input.tax_number);
    active.address = Set(input.address);
    active.website = Set(input.website);
    active.notes = Set(input.notes);
}

#[async_trait]
impl SupplierRepository for SupplierStore {
    async fn search(
        &self,
        filter: ContactFilter,
        params: PaginationParams,
    ) -> AppResult<(Vec<Supplier>, u64)> {
        let mut select = match filter.scope {
            ContactScope::Current => Self::find_current(),
            ContactScope::Deleted => {
                SupplierEntity::find().filter(supplier::Column::DeletedAt.is_not_null())
            }
        };

        if filter.active_only {
            select = select.filter(supplier::Column::IsActive.eq(true));
        }
        if let Some(term) = &filter.search {
            let pattern = like_pattern(term);
            select = select.filter(
                Condition::any()
                    .add(supplier::Column::Name.like(pattern.clone()))
                    .add(supplier::Column::ContactPerson.like(pattern.clone()))
                    .add(supplier::Column::Email.like(pattern.clone()))
                    .add(supplier::Column::TaxNumber.like(pattern)),
            );
        }

        let select = select
            .order_by_asc(supplier::Column::Name)
            .order_by_asc(supplier::Column::Id);
        let (rows, total) = fetch_page(self.db.as_ref(), select, params).await?;

        Ok((rows.into_iter().map(Supplier::from).collect(), total))
    }

    async fn list_active(&self) -> AppResult<Vec<Supplier>> {
        let models = Self::find_current()
            .filter(supplier::Column::IsActive.eq(true))
            .order_by_asc(supplier::Column::Name)
            .all(self.db.as_ref())
            .await?;
        Ok(models.into_iter().map(Supplier::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Supplier>> {
        let result = Self::find_current()
            .filter(supplier::Column::Id.eq(id))
            .one(self.db.as_ref())
            .await?;
        Ok(result.map(Supplier::from))
    }

    async fn find_by_id_with_deleted(&self, id: i32) -> AppResult<Option<Supplier>> {
        let result = SupplierEntity::find_by_id(id).one(self.db.as_ref()).await?;
        Ok(result.map(Supplier::from))
    }

    async fn create(&self, input: SupplierInput) -> AppResult<Supplier> {
        let now = Utc::now();
        let mut active = ActiveModel {
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };
        apply_input(&mut active, input);

        let model = active.insert(self.db.as_ref()).await?;
        Ok(Supplier::from(model))
    }

    async fn update(&self, id: i32, input: SupplierInput) -> AppResult<Supplier> {
        let mut active: ActiveModel = self.current_model(id).await?.into();
        apply_input(&mut active, input);
        active.updated_at = Set(Utc::now());

        let model = active.update(self.db.as_ref()).await?;
        Ok(Supplier::from(model))
    }

    async fn set_active(&self, id: i32, is_active: bool) -> AppResult<Supplier> {
        let mut active: ActiveModel = self.current_model(id).await?.into();
        active.is_active = Set(is_active);
        active.updated_at = Set(Utc::now());

        let model = active.update(self.db.as_ref()).await?;
        Ok(Supplier::from(model))
    }

    async fn soft_delete(&self, id: i32) -> AppResult<()> {
        let now = Utc::now();
        let mut active: ActiveModel = self.current_model(id).await?.into();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);
        active.update(self.db.as_ref()).await?;
        Ok(())
    }

    async fn restore(&self, id: i32) -> AppResult<Supplier> {
        let existing = SupplierEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or_not_found("Supplier")?;

        if existing.deleted_at.is_none() {
            return Err(AppError::conflict("Supplier is not deleted"));
        }

        let mut active: ActiveModel = existing.into();
        active.deleted_at = Set(None);
        active.updated_at = Set(Utc::now());
        let model = active.update(self.db.as_ref()).await?;
        Ok(Supplier::from(model))
    }
}
