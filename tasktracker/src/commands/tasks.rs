//! Task-related commands
//!
//! Listing, creation, completion and deletion. Failures are reported to the
//! user through notifications and returned to the caller unchanged.

use crate::app::AppState;
use crate::database::Task;
use crate::error::{AppError, Result};
use crate::services::{TaskForm, TaskListView, TaskStats};

/// Tasks currently held by the store
pub async fn list_tasks(state: &AppState) -> Vec<Task> {
    state.store.cached().await
}

/// Reload tasks from storage.
///
/// A failed load is reported and yields an empty list.
pub async fn refresh_tasks(state: &AppState) -> Vec<Task> {
    match state.store.refresh().await {
        Ok(tasks) => {
            state.events.tasks_changed();
            tasks
        }
        Err(e) => {
            tracing::error!("Error fetching tasks: {}", e);
            state.events.notify_error("Error", "Failed to load tasks");
            Vec::new()
        }
    }
}

/// Submit the add-task form
pub async fn add_task(state: &AppState, form: &mut TaskForm) -> Result<Task> {
    match state.form_controller.submit(form).await {
        Ok(task) => {
            state.events.notify(
                "Task added!",
                "Your task has been created with environment data",
            );
            state.events.tasks_changed();
            Ok(task)
        }
        Err(AppError::Validation(message)) => {
            state.events.notify_error("Title required", &message);
            Err(AppError::Validation(message))
        }
        Err(AppError::Busy) => Err(AppError::Busy),
        Err(e) => {
            tracing::error!("Error adding task: {}", e);
            state.events.notify_error("Error", "Failed to add task");
            Err(e)
        }
    }
}

pub async fn toggle_complete(state: &AppState, id: &str) -> Result<()> {
    match state.presenter.toggle_complete(id).await {
        Ok(()) => {
            state.events.tasks_changed();
            Ok(())
        }
        Err(e) => {
            tracing::error!("Error toggling task {}: {}", id, e);
            state.events.notify_error("Error", "Failed to update task");
            Err(e)
        }
    }
}

pub async fn delete_task(state: &AppState, id: &str) -> Result<()> {
    match state.presenter.delete_task(id).await {
        Ok(()) => {
            state
                .events
                .notify("Task deleted", "The task has been removed");
            state.events.tasks_changed();
            Ok(())
        }
        Err(e) => {
            tracing::error!("Error deleting task {}: {}", id, e);
            state.events.notify_error("Error", "Failed to delete task");
            Err(e)
        }
    }
}

pub async fn get_stats(state: &AppState) -> TaskStats {
    state.presenter.stats().await
}

pub async fn get_task_view(state: &AppState) -> TaskListView {
    state.presenter.view().await
}

/// A fresh form preselecting the configured category
pub fn new_task_form(state: &AppState) -> TaskForm {
    TaskForm::new(state.settings.default_category)
}

/// Whether the submit control should be disabled
pub fn is_collecting(state: &AppState) -> bool {
    state.form_controller.is_collecting()
}
