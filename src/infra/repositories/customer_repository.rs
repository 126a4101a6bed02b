//! Customer repository with soft delete.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Select, Set,
};

use super::base::{fetch_page, like_pattern};
use super::entities::customer::{self, ActiveModel, Entity as CustomerEntity};
use crate::domain::{ContactFilter, ContactScope, Customer, CustomerInput};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn search(
        &self,
        filter: ContactFilter,
        params: PaginationParams,
    ) -> AppResult<(Vec<Customer>, u64)>;

    /// Find a customer that has not been deleted
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Customer>>;

    /// Find a customer including soft-deleted ones
    async fn find_by_id_with_deleted(&self, id: i32) -> AppResult<Option<Customer>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Customer>>;

    async fn create(&self, input: CustomerInput) -> AppResult<Customer>;

    async fn update(&self, id: i32, input: CustomerInput) -> AppResult<Customer>;

    async fn soft_delete(&self, id: i32) -> AppResult<()>;

    async fn restore(&self, id: i32) -> AppResult<Customer>;
}

pub struct CustomerStore {
    db: Arc<DatabaseConnection>,
}

impl CustomerStore {
    pub fn new(db: impl Into<Arc<DatabaseConnection>>) -> Self {
        Self { db: db.into() }
    }

    fn find_current() -> Select<CustomerEntity> {
        CustomerEntity::find().filter(customer::Column::DeletedAt.is_null())
    }
}

fn apply_input(active: &mut ActiveModel, input: CustomerInput) {
    active.is_active = Set(input.active());
    active.name = Set(input.name);
    active.email = Set(input.email);
    active.phone = Set(input.phone);
    active.tax_number = Set(input.tax_number);
    active.address = Set(input.address);
    active.city = Set(input.city);
    active.postal_code = Set(input.postal_code);
    active.country = Set(input.country);
    active.notes = Set(input.notes);
}

#[async_trait]
impl CustomerRepository for CustomerStore {
    async fn search(
        &self,
        filter: ContactFilter,
        params: PaginationParams,
    ) -> AppResult<(Vec<Customer>, u64)> {
        let mut select = match filter.scope {
            ContactScope::Current => Self::find_current(),
            ContactScope::Deleted => {
                CustomerEntity::find().filter(customer::Column::DeletedAt.is_not_null())
            }
        };

        if filter.active_only {
            select = select.filter(customer::Column::IsActive.eq(true));
        }
        if let Some(term) = &filter.search {
            let pattern = like_pattern(term);
            select = select.filter(
                Condition::any()
                    .add(customer::Column::Name.like(pattern.clone()))
                    .add(customer::Column::Email.like(pattern.clone()))
                    .add(customer::Column::Phone.like(pattern.clone()))
                    .add(customer::Column::TaxNumber.like(pattern)),
            );
        }

        let select = select
            .order_by_asc(customer::Column::Name)
            .order_by_asc(customer::Column::Id);
        let (rows, total) = fetch_page(self.db.as_ref(), select, params).await?;

        Ok((rows.into_iter().map(Customer::from).collect(), total))
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Customer>> {
        let result = Self::find_current()
            .filter(customer::Column::Id.eq(id))
            .one(self.db.as_ref())
            .await?;
        Ok(result.map(Customer::from))
    }

    async fn find_by_id_with_deleted(&self, id: i32) -> AppResult<Option<Customer>> {
        let result = CustomerEntity::find_by_id(id).one(self.db.as_ref()).await?;
        Ok(result.map(Customer::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Customer>> {
        let result = Self::find_current()
            .filter(customer::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await?;
        Ok(result.map(Customer::from))
    }

    async fn create(&self, input: CustomerInput) -> AppResult<Customer> {
        let now = Utc::now();
        let mut active = ActiveModel {
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };
        apply_input(&mut active, input);

        let model = active.insert(self.db.as_ref()).await?;
        Ok(Customer::from(model))
    }

    async fn update(&self, id: i32, input: CustomerInput) -> AppResult<Customer> {
        let existing = Self::find_current()
            .filter(customer::Column::Id.eq(id))
            .one(self.db.as_ref())
            .await?
            .ok_or_not_found("Customer")?;

        let mut active: ActiveModel = existing.into();
        apply_input(&mut active, input);
        active.updated_at = Set(Utc::now());

        let model = active.update(self.db.as_ref()).await?;
        Ok(Customer::from(model))
    }

    async fn soft_delete(&self, id: i32) -> AppResult<()> {
        let existing = Self::find_current()
            .filter(customer::Column::Id.eq(id))
            .one(self.db.as_ref())
            .await?
            .ok_or_not_found("Customer")?;

        let now = Utc::now();
        let mut active: ActiveModel = existing.into();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);
        active.update(self.db.as_ref()).await?;
        Ok(())
    }

    async fn restore(&self, id: i32) -> AppResult<Customer> {
        let existing = CustomerEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or_not_found("Customer")?;

        if existing.deleted_at.is_none() {
            return Err(AppError::conflict("Customer is not deleted"));
        }

        let mut active: ActiveModel = existing.into();
        active.deleted_at = Set(None);
        active.updated_at = Set(Utc::now());
        let model = active.update(self.db.as_ref()).await?;
        Ok(Customer::from(model))
    }
}
