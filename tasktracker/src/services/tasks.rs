//! Task form service
//!
//! Validates form input, captures the environment snapshot and hands the
//! assembled draft to the store.

use crate::config;
use crate::database::{Category, Task, TaskDraft};
use crate::error::{AppError, Result};
use crate::services::environment::EnvironmentCollector;
use crate::store::TaskStore;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Form fields as entered by the user
#[derive(Debug, Clone, Default)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub category: Category,
}

impl TaskForm {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            ..Self::default()
        }
    }

    /// Clear the text fields after a successful submit. The category is kept.
    pub fn reset(&mut self) {
        self.title.clear();
        self.description.clear();
    }
}

/// Clears the collecting flag when dropped
struct CollectingGuard<'a>(&'a AtomicBool);

impl Drop for CollectingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct TaskFormController {
    store: Arc<dyn TaskStore>,
    collector: EnvironmentCollector,
    collecting: AtomicBool,
}

impl TaskFormController {
    pub fn new(store: Arc<dyn TaskStore>, collector: EnvironmentCollector) -> Self {
        Self {
            store,
            collector,
            collecting: AtomicBool::new(false),
        }
    }

    /// True while the environment snapshot is being collected
    pub fn is_collecting(&self) -> bool {
        self.collecting.load(Ordering::SeqCst)
    }

    /// Validate the form, collect the snapshot and create the task.
    ///
    /// On success the form's title and description are cleared.
    pub async fn submit(&self, form: &mut TaskForm) -> Result<Task> {
        let title = form.title.trim();
        if title.is_empty() {
            return Err(AppError::Validation(config::TITLE_REQUIRED.to_string()));
        }

        let environment_data = {
            if self
                .collecting
                .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
                .is_err()
            {
                return Err(AppError::Busy);
            }
            let _guard = CollectingGuard(&self.collecting);
            self.collector.collect().await
        };

        let description = form.description.trim();
        let draft = TaskDraft {
            title: title.to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            category: form.category,
            environment_data: Some(environment_data),
        };

        tracing::info!("Submitting task: {}", draft.title);
        let task = self.store.create(draft).await?;

        form.reset();
        Ok(task)
    }
}
