//! Task storage with interchangeable backends.
//!
//! Supports:
//! - `local`: on-device list, fully re-serialized on every mutation
//! - `remote`: hosted table scoped to the signed-in user
//!
//! Callers depend only on [`TaskStore`].

mod local;
mod remote;

pub use local::LocalTaskStore;
pub use remote::{RemoteTaskStore, TaskRow};

use crate::database::{Task, TaskDraft};
use crate::error::Result;
use async_trait::async_trait;

/// Task store trait - implemented by all storage backends.
///
/// Every implementation keeps its list newest-first by creation time.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Storage backend identifier
    fn kind(&self) -> &'static str;

    /// Current task list, newest first.
    async fn list(&self) -> Result<Vec<Task>>;

    /// Tasks currently held in memory, without touching backing storage.
    async fn cached(&self) -> Vec<Task>;

    /// Create a task from a draft. The store assigns id and creation time.
    async fn create(&self, draft: TaskDraft) -> Result<Task>;

    /// Set the completion flag. Unknown ids are ignored.
    async fn set_completed(&self, id: &str, completed: bool) -> Result<()>;

    /// Delete a task.
    async fn delete(&self, id: &str) -> Result<()>;

    /// Reload the list from the backing storage.
    async fn refresh(&self) -> Result<Vec<Task>> {
        self.list().await
    }

    /// Flip the completion flag of a cached task. Unknown ids are ignored.
    async fn toggle(&self, id: &str) -> Result<()> {
        let current = self
            .cached()
            .await
            .into_iter()
            .find(|t| t.id == id)
            .map(|t| t.completed);

        match current {
            Some(completed) => self.set_completed(id, !completed).await,
            None => {
                tracing::debug!("Ignoring toggle for unknown task: {}", id);
                Ok(())
            }
        }
    }
}
