//! On-device task store.
//!
//! The list lives in memory and is hydrated once from device storage.
//! Every mutation re-serializes the whole list and overwrites the stored
//! document; write failures are logged and not reported to the caller.

use super::TaskStore;
use crate::config;
use crate::database::{Repository, Task, TaskDraft};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

pub struct LocalTaskStore {
    repo: Repository,
    tasks: RwLock<Vec<Task>>,
}

impl LocalTaskStore {
    /// Open the store, hydrating the list from device storage.
    ///
    /// An unreadable or corrupt document yields an empty list.
    pub async fn open(repo: Repository) -> Self {
        let tasks = match repo.get_item(config::TASKS_STORAGE_KEY).await {
            Ok(Some(document)) => match serde_json::from_str::<Vec<Task>>(&document) {
                Ok(tasks) => tasks,
                Err(e) => {
                    tracing::warn!("Failed to parse stored tasks, starting empty: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read stored tasks, starting empty: {}", e);
                Vec::new()
            }
        };

        tracing::info!("Local task store hydrated with {} tasks", tasks.len());

        Self {
            repo,
            tasks: RwLock::new(tasks),
        }
    }

    /// Replace the entire list, as done by import. The incoming tasks are
    /// reordered newest-first.
    pub async fn replace_all(&self, mut tasks: Vec<Task>) {
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let mut guard = self.tasks.write().await;
        *guard = tasks;
        self.persist(&guard).await;
    }

    async fn persist(&self, tasks: &[Task]) {
        if let Err(e) = self.write_document(tasks).await {
            tracing::error!("{}", e);
        }
    }

    async fn write_document(&self, tasks: &[Task]) -> Result<()> {
        let document =
            serde_json::to_string(tasks).map_err(|e| AppError::Persist(e.to_string()))?;
        self.repo
            .set_item(config::TASKS_STORAGE_KEY, &document)
            .await
            .map_err(|e| AppError::Persist(e.to_string()))
    }
}

/// Timestamp-derived id, bumped past any id already in the list
fn next_id(tasks: &[Task]) -> String {
    let mut candidate = Utc::now().timestamp_millis();
    while tasks.iter().any(|t| t.id == candidate.to_string()) {
        candidate += 1;
    }
    candidate.to_string()
}

#[async_trait]
impl TaskStore for LocalTaskStore {
    fn kind(&self) -> &'static str {
        "local"
    }

    async fn list(&self) -> Result<Vec<Task>> {
        Ok(self.tasks.read().await.clone())
    }

    async fn cached(&self) -> Vec<Task> {
        self.tasks.read().await.clone()
    }

    async fn create(&self, draft: TaskDraft) -> Result<Task> {
        let mut tasks = self.tasks.write().await;

        let task = draft.into_task(next_id(&tasks), Utc::now());
        tasks.insert(0, task.clone());
        self.persist(&tasks).await;

        tracing::info!("Created local task: {}", task.id);
        Ok(task)
    }

    async fn set_completed(&self, id: &str, completed: bool) -> Result<()> {
        let mut tasks = self.tasks.write().await;

        let Some(task) = tasks.iter_mut().find(|t| t.id == id) else {
            tracing::debug!("Ignoring completion change for unknown task: {}", id);
            return Ok(());
        };
        task.completed = completed;
        self.persist(&tasks).await;

        tracing::debug!("Set local task {} completed={}", id, completed);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut tasks = self.tasks.write().await;

        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        if tasks.len() != before {
            self.persist(&tasks).await;
            tracing::info!("Deleted local task: {}", id);
        }

        Ok(())
    }
}
