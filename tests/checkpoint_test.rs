//! Checkpoint lifecycle against a temp directory, an in-memory tracking
//! table and a dump tool that only touches files.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use mockall::mock;

use gonzagas_catalog::domain::{Checkpoint, CheckpointInput, NewCheckpoint};
use gonzagas_catalog::errors::{AppError, AppResult};
use gonzagas_catalog::infra::{
    CheckpointRepository, CustomerRepository, DumpTool, FamilyRepository, InventoryRepository,
    ProductRepository, SupplierRepository, UnitOfWork, UserRepository,
};
use gonzagas_catalog::services::{CheckpointManager, CheckpointService};

mock! {
    pub Uow {}

    impl UnitOfWork for Uow {
        fn users(&self) -> Arc<dyn UserRepository>;
        fn families(&self) -> Arc<dyn FamilyRepository>;
        fn products(&self) -> Arc<dyn ProductRepository>;
        fn inventory(&self) -> Arc<dyn InventoryRepository>;
        fn customers(&self) -> Arc<dyn CustomerRepository>;
        fn suppliers(&self) -> Arc<dyn SupplierRepository>;
        fn checkpoints(&self) -> Arc<dyn CheckpointRepository>;
    }
}

/// Tracking table kept in memory.
#[derive(Default)]
struct MemoryCheckpoints {
    rows: Mutex<Vec<Checkpoint>>,
}

#[async_trait]
impl CheckpointRepository for MemoryCheckpoints {
    async fn list(&self) -> AppResult<Vec<Checkpoint>> {
        let mut rows = self.rows.lock().unwrap().clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Checkpoint>> {
        Ok(self.rows.lock().unwrap().iter().find(|c| c.id == id).cloned())
    }

    async fn create(&self, new: NewCheckpoint) -> AppResult<Checkpoint> {
        let mut rows = self.rows.lock().unwrap();
        let checkpoint = Checkpoint {
            id: rows.iter().map(|c| c.id).max().unwrap_or(0) + 1,
            checkpoint_name: new.checkpoint_name,
            description: new.description,
            file_name: new.file_name,
            file_size: new.file_size,
            created_by: new.created_by,
            created_at: Utc::now(),
        };
        rows.push(checkpoint.clone());
        Ok(checkpoint)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|c| c.id != id);
        if rows.len() == before {
            return Err(AppError::not_found("Checkpoint"));
        }
        Ok(())
    }
}

/// Writes a small dump and remembers what was restored.
#[derive(Default)]
struct FileDumpTool {
    dumps: Mutex<u32>,
    restored: Mutex<Vec<(PathBuf, String)>>,
}

#[async_trait]
impl DumpTool for FileDumpTool {
    async fn dump(&self, path: &Path) -> AppResult<()> {
        let n = {
            let mut dumps = self.dumps.lock().unwrap();
            *dumps += 1;
            *dumps
        };
        tokio::fs::write(path, format!("-- dump {}\n", n)).await?;
        Ok(())
    }

    async fn restore(&self, path: &Path) -> AppResult<()> {
        let content = tokio::fs::read_to_string(path).await?;
        self.restored
            .lock()
            .unwrap()
            .push((path.to_path_buf(), content));
        Ok(())
    }
}

fn manager(
    repo: Arc<MemoryCheckpoints>,
    tool: Arc<FileDumpTool>,
    dir: &Path,
    keep: usize,
) -> CheckpointManager<MockUow> {
    let mut uow = MockUow::new();
    uow.expect_checkpoints()
        .returning(move || repo.clone() as Arc<dyn CheckpointRepository>);
    CheckpointManager::new(Arc::new(uow), tool, dir, keep)
}

fn named(name: &str) -> CheckpointInput {
    CheckpointInput {
        name: Some(name.to_string()),
        description: Some("before price update".to_string()),
    }
}

fn sql_files(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "sql"))
        .count()
}

#[tokio::test]
async fn test_create_keeps_only_newest_checkpoints() {
    let dir = tempfile::tempdir().unwrap();
    let repo = Arc::new(MemoryCheckpoints::default());
    let tool = Arc::new(FileDumpTool::default());
    let checkpoints = manager(repo.clone(), tool, dir.path(), 2);

    for name in ["first", "second", "third"] {
        checkpoints
            .create(named(name), Some("admin".to_string()))
            .await
            .unwrap();
    }

    let list = checkpoints.list().await.unwrap();
    let names: Vec<&str> = list.iter().map(|c| c.checkpoint_name.as_str()).collect();
    assert_eq!(names, vec!["third", "second"]);
    assert_eq!(sql_files(dir.path()), 2);
    for checkpoint in &list {
        assert!(dir.path().join(&checkpoint.file_name).exists());
        assert!(checkpoint.file_size.is_some_and(|size| size > 0));
    }
}

#[tokio::test]
async fn test_same_second_dumps_get_distinct_files() {
    let dir = tempfile::tempdir().unwrap();
    let repo = Arc::new(MemoryCheckpoints::default());
    let checkpoints = manager(repo, Arc::new(FileDumpTool::default()), dir.path(), 10);

    let a = checkpoints.create(named("a"), None).await.unwrap();
    let b = checkpoints.create(named("b"), None).await.unwrap();

    assert_ne!(a.file_name, b.file_name);
    assert_eq!(sql_files(dir.path()), 2);
}

#[tokio::test]
async fn test_restore_replays_the_checkpoint_file() {
    let dir = tempfile::tempdir().unwrap();
    let repo = Arc::new(MemoryCheckpoints::default());
    let tool = Arc::new(FileDumpTool::default());
    let checkpoints = manager(repo, tool.clone(), dir.path(), 10);

    let first = checkpoints.create(named("first"), None).await.unwrap();
    checkpoints.create(named("second"), None).await.unwrap();

    let restored = checkpoints.restore(first.id).await.unwrap();

    assert_eq!(restored.checkpoint_name, "first");
    let calls = tool.restored.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, dir.path().join(&first.file_name));
    assert_eq!(calls[0].1, "-- dump 1\n");
}

#[tokio::test]
async fn test_restore_unknown_checkpoint_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let tool = Arc::new(FileDumpTool::default());
    let checkpoints = manager(
        Arc::new(MemoryCheckpoints::default()),
        tool.clone(),
        dir.path(),
        10,
    );

    let err = checkpoints.restore(99).await.unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
    assert!(tool.restored.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_removes_file_and_row() {
    let dir = tempfile::tempdir().unwrap();
    let repo = Arc::new(MemoryCheckpoints::default());
    let checkpoints = manager(repo, Arc::new(FileDumpTool::default()), dir.path(), 10);

    let created = checkpoints.create(named("temp"), None).await.unwrap();
    checkpoints.delete(created.id).await.unwrap();

    assert!(!dir.path().join(&created.file_name).exists());
    assert!(checkpoints.list().await.unwrap().is_empty());
    assert_eq!(checkpoints.prune().await.unwrap(), 0);
}
