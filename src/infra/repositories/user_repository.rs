//! Back-office user repository.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{NewUser, User};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>>;

    /// Usernames are matched exactly
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    async fn create(&self, user: NewUser) -> AppResult<User>;

    async fn update_password(&self, id: i32, password_hash: String) -> AppResult<()>;

    /// Stamp `last_login_at` with the current time
    async fn record_login(&self, id: i32) -> AppResult<()>;

    async fn list(&self) -> AppResult<Vec<User>>;
}

pub struct UserStore {
    db: Arc<DatabaseConnection>,
}

impl UserStore {
    pub fn new(db: impl Into<Arc<DatabaseConnection>>) -> Self {
        Self { db: db.into() }
    }

    async fn find_model(&self, id: i32) -> AppResult<user::Model> {
        UserEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or_not_found("User")
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id).one(self.db.as_ref()).await?;
        Ok(result.map(User::from))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(self.db.as_ref())
            .await?;
        Ok(result.map(User::from))
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        let now = Utc::now();
        let active_model = ActiveModel {
            username: Set(user.username),
            password_hash: Set(user.password_hash),
            role: Set(user.role.as_str().to_string()),
            is_active: Set(true),
            last_login_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model.insert(self.db.as_ref()).await.map_err(AppError::from)?;
        Ok(User::from(model))
    }

    async fn update_password(&self, id: i32, password_hash: String) -> AppResult<()> {
        let mut active: ActiveModel = self.find_model(id).await?.into();
        active.password_hash = Set(password_hash);
        active.updated_at = Set(Utc::now());
        active.update(self.db.as_ref()).await?;
        Ok(())
    }

    async fn record_login(&self, id: i32) -> AppResult<()> {
        let mut active: ActiveModel = self.find_model(id).await?.into();
        active.last_login_at = Set(Some(Utc::now()));
        active.update(self.db.as_ref()).await?;
        Ok(())
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .order_by_asc(user::Column::Username)
            .all(self.db.as_ref())
            .await?;
        Ok(models.into_iter().map(User::from).collect())
    }
}
