//! Checkpoint service - full database dumps with retention.
//!
//! A checkpoint is a dump file under the checkpoint directory plus a row in
//! the `checkpoints` table. The row is only written once the dump succeeded,
//! so every listed checkpoint points at a complete file. Operations are
//! serialized: two dumps or a dump racing a restore would produce garbage.

use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use validator::Validate;

use crate::domain::checkpoint::{
    checkpoint_file_name, default_checkpoint_name, is_safe_file_name, numbered_file_name,
    select_for_pruning,
};
use crate::domain::{Checkpoint, CheckpointInput, NewCheckpoint};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{DumpTool, UnitOfWork};

#[async_trait]
pub trait CheckpointService: Send + Sync {
    /// Newest first
    async fn list(&self) -> AppResult<Vec<Checkpoint>>;

    async fn create(&self, input: CheckpointInput, created_by: Option<String>)
        -> AppResult<Checkpoint>;

    async fn restore(&self, id: i32) -> AppResult<Checkpoint>;

    async fn delete(&self, id: i32) -> AppResult<()>;

    /// Drop everything beyond the retention count, returning how many went
    async fn prune(&self) -> AppResult<usize>;
}

pub struct CheckpointManager<U: UnitOfWork> {
    uow: Arc<U>,
    tool: Arc<dyn DumpTool>,
    dir: PathBuf,
    keep: usize,
    lock: Mutex<()>,
}

impl<U: UnitOfWork> CheckpointManager<U> {
    pub fn new(uow: Arc<U>, tool: Arc<dyn DumpTool>, dir: impl Into<PathBuf>, keep: usize) -> Self {
        Self {
            uow,
            tool,
            dir: dir.into(),
            keep,
            lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn resolve(&self, file_name: &str) -> AppResult<PathBuf> {
        if !is_safe_file_name(file_name) {
            tracing::error!(file_name = %file_name, "Refusing unsafe checkpoint file name");
            return Err(AppError::internal("Invalid checkpoint file name"));
        }
        Ok(self.dir.join(file_name))
    }

    /// First free file name for this second.
    async fn free_file_name(&self) -> AppResult<String> {
        let now = Utc::now();
        let mut name = checkpoint_file_name(now);
        let mut n = 2;
        while tokio::fs::try_exists(self.dir.join(&name)).await? {
            name = numbered_file_name(now, n);
            n += 1;
        }
        Ok(name)
    }

    async fn remove_file(&self, checkpoint: &Checkpoint) -> AppResult<()> {
        let path = self.resolve(&checkpoint.file_name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    checkpoint_id = checkpoint.id,
                    path = %path.display(),
                    "Checkpoint file already missing"
                );
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_locked(&self, checkpoint: &Checkpoint) -> AppResult<()> {
        self.remove_file(checkpoint).await?;
        self.uow.checkpoints().delete(checkpoint.id).await?;
        tracing::info!(
            checkpoint_id = checkpoint.id,
            file_name = %checkpoint.file_name,
            "Checkpoint deleted"
        );
        Ok(())
    }

    async fn prune_locked(&self) -> AppResult<usize> {
        let all = self.uow.checkpoints().list().await?;
        let doomed = select_for_pruning(&all, self.keep);

        let mut removed = 0;
        for checkpoint in doomed {
            match self.delete_locked(checkpoint).await {
                Ok(()) => removed += 1,
                Err(e) => tracing::error!(
                    checkpoint_id = checkpoint.id,
                    error = %e,
                    "Failed to prune checkpoint"
                ),
            }
        }

        if removed > 0 {
            tracing::info!(removed, keep = self.keep, "Old checkpoints pruned");
        }
        Ok(removed)
    }
}

#[async_trait]
impl<U: UnitOfWork> CheckpointService for CheckpointManager<U> {
    async fn list(&self) -> AppResult<Vec<Checkpoint>> {
        self.uow.checkpoints().list().await
    }

    async fn create(
        &self,
        input: CheckpointInput,
        created_by: Option<String>,
    ) -> AppResult<Checkpoint> {
        input.validate()?;
        let _guard = self.lock.lock().await;

        tokio::fs::create_dir_all(&self.dir).await?;
        let file_name = self.free_file_name().await?;
        let path = self.dir.join(&file_name);

        tracing::info!(path = %path.display(), "Creating checkpoint");
        if let Err(e) = self.tool.dump(&path).await {
            if let Err(cleanup) = tokio::fs::remove_file(&path).await {
                if cleanup.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(error = %cleanup, "Could not remove partial dump");
                }
            }
            tracing::error!(error = %e, "Checkpoint dump failed");
            return Err(e);
        }

        let file_size = tokio::fs::metadata(&path)
            .await
            .ok()
            .and_then(|m| i64::try_from(m.len()).ok());

        let name = input
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| default_checkpoint_name(Utc::now()));
        let description = input
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        let checkpoint = self
            .uow
            .checkpoints()
            .create(NewCheckpoint {
                checkpoint_name: name,
                description,
                file_name,
                file_size,
                created_by,
            })
            .await?;

        tracing::info!(
            checkpoint_id = checkpoint.id,
            file_name = %checkpoint.file_name,
            file_size = ?checkpoint.file_size,
            "Checkpoint created"
        );

        if let Err(e) = self.prune_locked().await {
            tracing::error!(error = %e, "Checkpoint pruning failed");
        }

        Ok(checkpoint)
    }

    async fn restore(&self, id: i32) -> AppResult<Checkpoint> {
        let _guard = self.lock.lock().await;

        let checkpoint = self
            .uow
            .checkpoints()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Checkpoint")?;

        let path = self.resolve(&checkpoint.file_name)?;
        if !tokio::fs::try_exists(&path).await? {
            return Err(AppError::not_found("Checkpoint file"));
        }

        tracing::warn!(checkpoint_id = id, path = %path.display(), "Restoring checkpoint");
        self.tool.restore(&path).await?;
        tracing::info!(checkpoint_id = id, "Checkpoint restored");

        Ok(checkpoint)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let _guard = self.lock.lock().await;

        let checkpoint = self
            .uow
            .checkpoints()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Checkpoint")?;
        self.delete_locked(&checkpoint).await
    }

    async fn prune(&self) -> AppResult<usize> {
        let _guard = self.lock.lock().await;
        self.prune_locked().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{CheckpointRepository, MockCheckpointRepository, MockDumpTool, MockUnitOfWork};
    use chrono::Duration;

    fn checkpoint(id: i32, file_name: &str, age_minutes: i64) -> Checkpoint {
        Checkpoint {
            id,
            checkpoint_name: format!("cp {}", id),
            description: None,
            file_name: file_name.to_string(),
            file_size: Some(10),
            created_by: None,
            created_at: Utc::now() - Duration::minutes(age_minutes),
        }
    }

    fn manager(
        repo: MockCheckpointRepository,
        tool: MockDumpTool,
        dir: &Path,
        keep: usize,
    ) -> CheckpointManager<MockUnitOfWork> {
        let repo: Arc<dyn CheckpointRepository> = Arc::new(repo);
        let mut uow = MockUnitOfWork::new();
        uow.expect_checkpoints().returning(move || repo.clone());
        CheckpointManager::new(Arc::new(uow), Arc::new(tool), dir, keep)
    }

    #[tokio::test]
    async fn test_failed_dump_records_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut tool = MockDumpTool::new();
        tool.expect_dump().returning(|path| {
            std::fs::write(path, b"partial").unwrap();
            Err(AppError::Tool("mysqldump exited with status 2".to_string()))
        });
        let mut repo = MockCheckpointRepository::new();
        repo.expect_create().never();

        let err = manager(repo, tool, dir.path(), 10)
            .create(CheckpointInput::default(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Tool(_)));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_create_records_size_and_default_name() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested");
        let mut tool = MockDumpTool::new();
        tool.expect_dump().returning(|path| {
            std::fs::write(path, b"-- dump\n").unwrap();
            Ok(())
        });
        let mut repo = MockCheckpointRepository::new();
        repo.expect_create()
            .withf(|new| {
                new.file_size == Some(8)
                    && new.checkpoint_name.starts_with("Checkpoint ")
                    && new.file_name.starts_with("checkpoint_")
            })
            .returning(|new| {
                Ok(Checkpoint {
                    id: 1,
                    checkpoint_name: new.checkpoint_name,
                    description: new.description,
                    file_name: new.file_name,
                    file_size: new.file_size,
                    created_by: new.created_by,
                    created_at: Utc::now(),
                })
            });
        repo.expect_list().returning(|| Ok(vec![]));

        let created = manager(repo, tool, &target, 10)
            .create(
                CheckpointInput {
                    name: Some("  ".to_string()),
                    description: None,
                },
                Some("maria".to_string()),
            )
            .await
            .unwrap();

        assert!(target.join(&created.file_name).exists());
        assert_eq!(created.created_by.as_deref(), Some("maria"));
    }

    #[tokio::test]
    async fn test_restore_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut tool = MockDumpTool::new();
        tool.expect_restore().never();
        let mut repo = MockCheckpointRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(checkpoint(id, "checkpoint_20240101_000000.sql", 0))));

        let err = manager(repo, tool, dir.path(), 10)
            .restore(5)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Checkpoint file not found");
    }

    #[tokio::test]
    async fn test_delete_tolerates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = MockCheckpointRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(checkpoint(id, "checkpoint_20240101_000000.sql", 0))));
        repo.expect_delete().times(1).returning(|_| Ok(()));

        manager(repo, MockDumpTool::new(), dir.path(), 10)
            .delete(3)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_prune_removes_oldest_beyond_limit() {
        let dir = tempfile::tempdir().unwrap();
        let names = [
            "checkpoint_20240101_000001.sql",
            "checkpoint_20240101_000002.sql",
            "checkpoint_20240101_000003.sql",
        ];
        for name in names {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }

        let mut repo = MockCheckpointRepository::new();
        repo.expect_list().returning(move || {
            Ok(vec![
                checkpoint(3, names[2], 1),
                checkpoint(2, names[1], 2),
                checkpoint(1, names[0], 3),
            ])
        });
        repo.expect_delete()
            .withf(|id| *id == 1)
            .times(1)
            .returning(|_| Ok(()));

        let removed = manager(repo, MockDumpTool::new(), dir.path(), 2)
            .prune()
            .await
            .unwrap();

        assert_eq!(removed, 1);
        assert!(!dir.path().join(names[0]).exists());
        assert!(dir.path().join(names[2]).exists());
    }
}
