//! Customer and supplier address books.

use async_trait::async_trait;
use std::sync::Arc;
use validator::Validate;

use crate::domain::{ContactFilter, Customer, CustomerInput, Supplier, SupplierInput};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

#[async_trait]
pub trait CustomerService: Send + Sync {
    async fn list(
        &self,
        filter: ContactFilter,
        params: PaginationParams,
    ) -> AppResult<Paginated<Customer>>;

    async fn get(&self, id: i32) -> AppResult<Customer>;

    async fn create(&self, input: CustomerInput) -> AppResult<Customer>;

    async fn update(&self, id: i32, input: CustomerInput) -> AppResult<Customer>;

    /// Soft delete
    async fn delete(&self, id: i32) -> AppResult<()>;

    async fn restore(&self, id: i32) -> AppResult<Customer>;
}

#[async_trait]
pub trait SupplierService: Send + Sync {
    async fn list(
        &self,
        filter: ContactFilter,
        params: PaginationParams,
    ) -> AppResult<Paginated<Supplier>>;

    async fn list_active(&self) -> AppResult<Vec<Supplier>>;

    async fn get(&self, id: i32) -> AppResult<Supplier>;

    async fn create(&self, input: SupplierInput) -> AppResult<Supplier>;

    async fn update(&self, id: i32, input: SupplierInput) -> AppResult<Supplier>;

    /// Flip the active flag, returning the updated supplier
    async fn toggle_active(&self, id: i32) -> AppResult<Supplier>;

    async fn delete(&self, id: i32) -> AppResult<()>;

    async fn restore(&self, id: i32) -> AppResult<Supplier>;
}

pub struct CustomerManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CustomerManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn ensure_email_free(&self, email: Option<&str>, current: Option<i32>) -> AppResult<()> {
        let Some(email) = email else {
            return Ok(());
        };
        match self.uow.customers().find_by_email(email).await? {
            Some(existing) if Some(existing.id) != current => Err(AppError::already_exists(
                format!("Customer with email '{}'", email),
            )),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> CustomerService for CustomerManager<U> {
    async fn list(
        &self,
        filter: ContactFilter,
        params: PaginationParams,
    ) -> AppResult<Paginated<Customer>> {
        let (rows, total) = self.uow.customers().search(filter, params).await?;
        Ok(Paginated::new(rows, params, total))
    }

    async fn get(&self, id: i32) -> AppResult<Customer> {
        self.uow.customers().find_by_id(id).await?.ok_or_not_found("Customer")
    }

    async fn create(&self, input: CustomerInput) -> AppResult<Customer> {
        let input = input.normalized();
        input.validate()?;
        self.ensure_email_free(input.email.as_deref(), None).await?;

        let customer = self.uow.customers().create(input).await?;
        tracing::info!(customer_id = customer.id, "Customer created");
        Ok(customer)
    }

    async fn update(&self, id: i32, input: CustomerInput) -> AppResult<Customer> {
        let input = input.normalized();
        input.validate()?;
        self.ensure_email_free(input.email.as_deref(), Some(id)).await?;

        self.uow.customers().update(id, input).await
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        self.uow.customers().soft_delete(id).await?;
        tracing::info!(customer_id = id, "Customer deleted");
        Ok(())
    }

    async fn restore(&self, id: i32) -> AppResult<Customer> {
        let customer = self.uow.customers().restore(id).await?;
        tracing::info!(customer_id = id, "Customer restored");
        Ok(customer)
    }
}

pub struct SupplierManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> SupplierManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> SupplierService for SupplierManager<U> {
    async fn list(
        &self,
        filter: ContactFilter,
        params: PaginationParams,
    ) -> AppResult<Paginated<Supplier>> {
        let (rows, total) = self.uow.suppliers().search(filter, params).await?;
        Ok(Paginated::new(rows, params, total))
    }

    async fn list_active(&self) -> AppResult<Vec<Supplier>> {
        self.uow.suppliers().list_active().await
    }

    async fn get(&self, id: i32) -> AppResult<Supplier> {
        self.uow.suppliers().find_by_id(id).await?.ok_or_not_found("Supplier")
    }

    async fn create(&self, input: SupplierInput) -> AppResult<Supplier> {
        let input = input.normalized();
        input.validate()?;

        let supplier = self.uow.suppliers().create(input).await?;
        tracing::info!(supplier_id = supplier.id, "Supplier created");
        Ok(supplier)
    }

    async fn update(&self, id: i32, input: SupplierInput) -> AppResult<Supplier> {
        let input = input.normalized();
        input.validate()?;
        self.uow.suppliers().update(id, input).await
    }

    async fn toggle_active(&self, id: i32) -> AppResult<Supplier> {
        let current = self.get(id).await?;
        let supplier = self
            .uow
            .suppliers()
            .set_active(id, !current.is_active)
            .await?;
        tracing::info!(supplier_id = id, active = supplier.is_active, "Supplier status changed");
        Ok(supplier)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        self.uow.suppliers().soft_delete(id).await?;
        tracing::info!(supplier_id = id, "Supplier deleted");
        Ok(())
    }

    async fn restore(&self, id: i32) -> AppResult<Supplier> {
        let supplier = self.uow.suppliers().restore(id).await?;
        tracing::info!(supplier_id = id, "Supplier restored");
        Ok(supplier)
    }
}
