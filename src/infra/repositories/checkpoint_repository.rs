//! Checkpoint tracking rows.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};

use super::entities::checkpoint::{self, ActiveModel, Entity as CheckpointEntity};
use crate::domain::{Checkpoint, NewCheckpoint};
use crate::errors::{AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CheckpointRepository: Send + Sync {
    /// Newest first
    async fn list(&self) -> AppResult<Vec<Checkpoint>>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Checkpoint>>;

    async fn create(&self, checkpoint: NewCheckpoint) -> AppResult<Checkpoint>;

    async fn delete(&self, id: i32) -> AppResult<()>;
}

pub struct CheckpointStore {
    db: Arc<DatabaseConnection>,
}

impl CheckpointStore {
    pub fn new(db: impl Into<Arc<DatabaseConnection>>) -> Self {
        Self { db: db.into() }
    }
}

#[async_trait]
impl CheckpointRepository for CheckpointStore {
    async fn list(&self) -> AppResult<Vec<Checkpoint>> {
        let models = CheckpointEntity::find()
            .order_by_desc(checkpoint::Column::CreatedAt)
            .order_by_desc(checkpoint::Column::Id)
            .all(self.db.as_ref())
            .await?;
        Ok(models.into_iter().map(Checkpoint::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Checkpoint>> {
        let result = CheckpointEntity::find_by_id(id).one(self.db.as_ref()).await?;
        Ok(result.map(Checkpoint::from))
    }

    async fn create(&self, checkpoint: NewCheckpoint) -> AppResult<Checkpoint> {
        let model = ActiveModel {
            checkpoint_name: Set(checkpoint.checkpoint_name),
            description: Set(checkpoint.description),
            file_name: Set(checkpoint.file_name),
            file_size: Set(checkpoint.file_size),
            created_by: Set(checkpoint.created_by),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await?;
        Ok(Checkpoint::from(model))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        CheckpointEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or_not_found("Checkpoint")?;
        CheckpointEntity::delete_by_id(id).exec(self.db.as_ref()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn model(id: i32, second: u32) -> checkpoint::Model {
        checkpoint::Model {
            id,
            checkpoint_name: format!("Checkpoint {}", id),
            description: None,
            file_name: format!("checkpoint_{}.sql", id),
            file_size: Some(2048),
            created_by: Some("admin".to_string()),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, second).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_list_maps_rows() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([vec![model(2, 5), model(1, 1)]])
            .into_connection();
        let store = CheckpointStore::new(db);

        let list = store.list().await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, 2);
        assert_eq!(list[0].file_size, Some(2048));
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([Vec::<checkpoint::Model>::new()])
            .into_connection();
        let store = CheckpointStore::new(db);

        let err = store.delete(9).await.unwrap_err();
        assert_eq!(err.to_string(), "Checkpoint not found");
    }
}
