//! Family service.

use async_trait::async_trait;
use std::sync::Arc;
use validator::Validate;

use crate::domain::family::family_in_use_message;
use crate::domain::{Family, FamilyInput, FamilyWithCount};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait FamilyService: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Family>>;

    async fn list_with_counts(&self) -> AppResult<Vec<FamilyWithCount>>;

    async fn get(&self, id: i32) -> AppResult<Family>;

    async fn create(&self, input: FamilyInput) -> AppResult<Family>;

    async fn update(&self, id: i32, input: FamilyInput) -> AppResult<Family>;

    /// Refused while any product still belongs to the family
    async fn delete(&self, id: i32) -> AppResult<()>;
}

pub struct FamilyManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> FamilyManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn ensure_code_free(&self, code: &str, current: Option<i32>) -> AppResult<()> {
        match self.uow.families().find_by_code(code).await? {
            Some(existing) if Some(existing.id) != current => Err(AppError::already_exists(
                format!("Family with code '{}'", code),
            )),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> FamilyService for FamilyManager<U> {
    async fn list(&self) -> AppResult<Vec<Family>> {
        self.uow.families().list().await
    }

    async fn list_with_counts(&self) -> AppResult<Vec<FamilyWithCount>> {
        self.uow.families().list_with_counts().await
    }

    async fn get(&self, id: i32) -> AppResult<Family> {
        self.uow.families().find_by_id(id).await?.ok_or_not_found("Family")
    }

    async fn create(&self, input: FamilyInput) -> AppResult<Family> {
        let input = input.normalized();
        input.validate()?;
        self.ensure_code_free(&input.code, None).await?;

        let family = self.uow.families().create(input).await?;
        tracing::info!(family_id = family.id, code = %family.code, "Family created");
        Ok(family)
    }

    async fn update(&self, id: i32, input: FamilyInput) -> AppResult<Family> {
        self.get(id).await?;

        let input = input.normalized();
        input.validate()?;
        self.ensure_code_free(&input.code, Some(id)).await?;

        self.uow.families().update(id, input).await
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let family = self.get(id).await?;

        let in_use = self.uow.families().product_count(id).await?;
        if in_use > 0 {
            return Err(AppError::conflict(family_in_use_message(&family, in_use)));
        }

        self.uow.families().delete(id).await?;
        tracing::info!(family_id = id, code = %family.code, "Family deleted");
        Ok(())
    }
}
