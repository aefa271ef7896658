//! Task list presentation
//!
//! Derives counts and cards from a task list and forwards toggle/delete
//! intents to the store unchanged.

use crate::config;
use crate::database::Task;
use crate::error::Result;
use crate::store::TaskStore;
use serde::Serialize;
use std::sync::Arc;

/// Counts shown on the statistics tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// Percentage of completed tasks, 0 when there are none
    pub success_rate: u32,
}

impl TaskStats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = completed_tasks(tasks).len();

        Self {
            total,
            completed,
            pending: total - completed,
            success_rate: success_rate(completed, total),
        }
    }
}

pub fn completed_tasks(tasks: &[Task]) -> Vec<&Task> {
    tasks.iter().filter(|t| t.completed).collect()
}

pub fn pending_tasks(tasks: &[Task]) -> Vec<&Task> {
    tasks.iter().filter(|t| !t.completed).collect()
}

/// `round(100 * completed / total)`, or 0 for an empty list
pub fn success_rate(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (100.0 * completed as f64 / total as f64).round() as u32
}

/// One rendered task
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskCard {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub completed: bool,
    pub created: String,
    /// Environment badges, empty when the task has no snapshot
    pub badges: Vec<String>,
}

impl From<&Task> for TaskCard {
    fn from(task: &Task) -> Self {
        let mut badges = Vec::new();
        if let Some(env) = &task.environment_data {
            badges.push(format!("Platform: {}", env.device.platform));
            if !env.device.model.is_empty() {
                badges.push(format!("Model: {}", env.device.model));
            }
            if let Some(version) = &env.device.os_version {
                badges.push(format!("OS: {}", version));
            }
            badges.push(format!("Location: {}", env.location));
        }

        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            description: task.description.clone(),
            category: task.category.to_string(),
            completed: task.completed,
            created: task.created_at.format(config::CARD_DATE_FORMAT).to_string(),
            badges,
        }
    }
}

/// What the list tab shows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskListView {
    Empty { title: String, hint: String },
    Tasks { cards: Vec<TaskCard> },
}

impl TaskListView {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        if tasks.is_empty() {
            return TaskListView::Empty {
                title: config::EMPTY_LIST_TITLE.to_string(),
                hint: config::EMPTY_LIST_HINT.to_string(),
            };
        }
        TaskListView::Tasks {
            cards: tasks.iter().map(TaskCard::from).collect(),
        }
    }
}

#[derive(Clone)]
pub struct TaskListPresenter {
    store: Arc<dyn TaskStore>,
}

impl TaskListPresenter {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    pub async fn view(&self) -> TaskListView {
        TaskListView::from_tasks(&self.store.cached().await)
    }

    pub async fn stats(&self) -> TaskStats {
        TaskStats::from_tasks(&self.store.cached().await)
    }

    pub async fn toggle_complete(&self, id: &str) -> Result<()> {
        self.store.toggle(id).await
    }

    pub async fn delete_task(&self, id: &str) -> Result<()> {
        self.store.delete(id).await
    }
}
