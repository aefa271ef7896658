//! Import/export of the on-device task list
//!
//! Export writes the whole list as a JSON document named after the current
//! date. Import replaces the whole list; nothing is merged.

use crate::config;
use crate::database::Task;
use crate::error::{AppError, Result};
use crate::store::{LocalTaskStore, TaskStore};
use chrono::{NaiveDate, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;

/// `tasks_<YYYY-MM-DD>.json`
pub fn export_file_name(date: NaiveDate) -> String {
    format!(
        "{}{}.{}",
        config::EXPORT_FILE_PREFIX,
        date.format("%Y-%m-%d"),
        config::EXPORT_FILE_EXTENSION
    )
}

#[derive(Clone)]
pub struct TransferService {
    store: Arc<LocalTaskStore>,
}

impl TransferService {
    pub fn new(store: Arc<LocalTaskStore>) -> Self {
        Self { store }
    }

    /// Serialize the current list
    pub async fn export_document(&self) -> Result<String> {
        let tasks = self.store.cached().await;
        Ok(serde_json::to_string_pretty(&tasks)?)
    }

    /// Write the current list into `dir`, returning the file path
    pub async fn export_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        let document = self.export_document().await?;

        fs::create_dir_all(dir).await?;
        let path = dir.join(export_file_name(Utc::now().date_naive()));
        fs::write(&path, document).await?;

        tracing::info!("Exported tasks to {:?}", path);
        Ok(path)
    }

    /// Replace the list with the tasks in `document`.
    ///
    /// On a parse failure the current list is left untouched.
    pub async fn import_document(&self, document: &str) -> Result<usize> {
        let tasks: Vec<Task> = serde_json::from_str(document).map_err(|e| {
            tracing::warn!("Rejected import document: {}", e);
            AppError::Import(config::INVALID_FILE_FORMAT.to_string())
        })?;

        let count = tasks.len();
        self.store.replace_all(tasks).await;

        tracing::info!("Imported {} tasks", count);
        Ok(count)
    }

    pub async fn import_file(&self, path: &Path) -> Result<usize> {
        let document = fs::read_to_string(path).await?;
        self.import_document(&document).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{initialize_storage, Category, Repository, TaskDraft};
    use sqlx::sqlite::SqlitePoolOptions;
    use std::collections::HashSet;
    use tempfile::TempDir;

    async fn create_test_service() -> (TransferService, Arc<LocalTaskStore>) {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        initialize_storage(&pool).await.unwrap();
        let store = Arc::new(LocalTaskStore::open(Repository::new(pool)).await);
        (TransferService::new(store.clone()), store)
    }

    fn draft(title: &str) -> TaskDraft {
        TaskDraft {
            title: title.to_string(),
            description: Some("details".to_string()),
            category: Category::Urgent,
            environment_data: None,
        }
    }

    #[test]
    fn test_export_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 9).unwrap();
        assert_eq!(export_file_name(date), "tasks_2024-07-09.json");
    }

    #[tokio::test]
    async fn test_empty_round_trip() {
        let (service, store) = create_test_service().await;

        let document = service.export_document().await.unwrap();
        let count = service.import_document(&document).await.unwrap();

        assert_eq!(count, 0);
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_round_trip_keeps_ids() {
        let (service, store) = create_test_service().await;
        for title in ["a", "b", "c"] {
            store.create(draft(title)).await.unwrap();
        }
        let original: HashSet<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();

        let document = service.export_document().await.unwrap();
        store.replace_all(Vec::new()).await;
        service.import_document(&document).await.unwrap();

        let restored: HashSet<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(restored, original);
    }

    #[tokio::test]
    async fn test_import_replaces_without_merge() {
        let (service, store) = create_test_service().await;
        store.create(draft("existing")).await.unwrap();

        let document = r#"[{"id":"42","title":"imported","completed":true,"createdAt":"2024-01-01T00:00:00Z"}]"#;
        service.import_document(document).await.unwrap();

        let tasks = store.list().await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, "42");
        assert!(tasks[0].completed);
    }

    #[tokio::test]
    async fn test_import_orders_newest_first() {
        let (service, store) = create_test_service().await;

        let document = r#"[
            {"id":"1","title":"old","createdAt":"2020-01-01T00:00:00Z"},
            {"id":"2","title":"new","createdAt":"2024-01-01T00:00:00Z"},
            {"id":"3","title":"middle","createdAt":"2022-06-01T00:00:00Z"}
        ]"#;
        service.import_document(document).await.unwrap();

        let titles: Vec<String> = store.list().await.unwrap().into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["new", "middle", "old"]);

        let created = store.create(draft("latest")).await.unwrap();
        let tasks = store.list().await.unwrap();
        assert_eq!(tasks[0].id, created.id);
        assert!(tasks.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }

    #[tokio::test]
    async fn test_malformed_import_leaves_list_untouched() {
        let (service, store) = create_test_service().await;
        store.create(draft("keep me")).await.unwrap();
        let before = store.list().await.unwrap();

        for document in ["", "{", r#"{"id":"1"}"#, r#"[{"title":"no id"}]"#] {
            let result = service.import_document(document).await;
            match result {
                Err(AppError::Import(message)) => assert_eq!(message, "Invalid file format"),
                other => panic!("expected import error, got {:?}", other),
            }
        }

        assert_eq!(store.list().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_export_file_then_import_file() {
        let (service, store) = create_test_service().await;
        let temp = TempDir::new().unwrap();
        let created = store.create(draft("on disk")).await.unwrap();

        let path = service.export_to_dir(temp.path()).await.unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("tasks_"));
        assert!(name.ends_with(".json"));

        store.delete(&created.id).await.unwrap();
        assert_eq!(service.import_file(&path).await.unwrap(), 1);
        assert_eq!(store.list().await.unwrap()[0].id, created.id);
    }
}
