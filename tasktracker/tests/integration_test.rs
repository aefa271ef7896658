//! Integration tests for the task tracker
//!
//! These tests verify end-to-end functionality on the on-device store:
//! - Form submission through the command layer
//! - Toggle/delete dispatch and statistics
//! - Export and import workflows
//! - Persistence across restarts

use async_trait::async_trait;
use std::sync::Arc;
use tasktracker::app::AppState;
use tasktracker::commands;
use tasktracker::database::{Category, DeviceInfo};
use tasktracker::error::{AppError, Result};
use tasktracker::events::{AppEvent, Variant};
use tasktracker::services::{
    AppSettings, DeviceProbe, EnvironmentCollector, TaskForm, TaskListView,
};
use tempfile::TempDir;

struct UnavailableProbe;

#[async_trait]
impl DeviceProbe for UnavailableProbe {
    async fn device_info(&self) -> Result<DeviceInfo> {
        Err(AppError::CollectionDegraded("device plugin missing".to_string()))
    }

    async fn location_available(&self) -> Result<bool> {
        Ok(false)
    }

    async fn battery_available(&self) -> Result<bool> {
        Ok(false)
    }
}

/// Helper to create a local-mode app in a temp directory
async fn create_test_app(dir: &TempDir) -> AppState {
    AppState::initialize_with(
        dir.path().to_path_buf(),
        AppSettings::default(),
        EnvironmentCollector::new(Arc::new(UnavailableProbe)),
    )
    .await
    .unwrap()
}

fn form(title: &str) -> TaskForm {
    TaskForm {
        title: title.to_string(),
        description: String::new(),
        category: Category::General,
    }
}

#[tokio::test]
async fn test_task_lifecycle() {
    let temp = TempDir::new().unwrap();
    let state = create_test_app(&temp).await;

    assert!(matches!(
        commands::get_task_view(&state).await,
        TaskListView::Empty { .. }
    ));

    let first = commands::add_task(&state, &mut form("First")).await.unwrap();
    let second = commands::add_task(&state, &mut form("Second")).await.unwrap();

    let tasks = commands::list_tasks(&state).await;
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].id, second.id);

    // Fallback snapshot when the host cannot be read
    let env = first.environment_data.as_ref().unwrap();
    assert_eq!(env.device.platform, "web");
    assert_eq!(env.location, "Not available");

    commands::toggle_complete(&state, &first.id).await.unwrap();
    let stats = commands::get_stats(&state).await;
    assert_eq!((stats.total, stats.completed, stats.pending), (2, 1, 1));
    assert_eq!(stats.success_rate, 50);

    commands::delete_task(&state, &second.id).await.unwrap();
    let tasks = commands::list_tasks(&state).await;
    assert!(tasks.iter().all(|t| t.id != second.id));
    assert_eq!(commands::get_stats(&state).await.success_rate, 100);
}

#[tokio::test]
async fn test_empty_title_reports_validation() {
    let temp = TempDir::new().unwrap();
    let state = create_test_app(&temp).await;
    let mut events = state.events.subscribe();

    let result = commands::add_task(&state, &mut form("   ")).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(commands::list_tasks(&state).await.is_empty());

    match events.recv().await.unwrap() {
        AppEvent::Notification(n) => {
            assert_eq!(n.title, "Title required");
            assert_eq!(n.variant, Variant::Destructive);
        }
        other => panic!("unexpected event {:?}", other),
    }
}

#[tokio::test]
async fn test_tasks_survive_restart() {
    let temp = TempDir::new().unwrap();

    let id = {
        let state = create_test_app(&temp).await;
        let task = commands::add_task(&state, &mut form("Durable")).await.unwrap();
        commands::toggle_complete(&state, &task.id).await.unwrap();
        task.id
    };

    let state = create_test_app(&temp).await;
    let tasks = commands::list_tasks(&state).await;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, id);
    assert!(tasks[0].completed);
}

#[tokio::test]
async fn test_export_and_import_workflow() {
    let temp = TempDir::new().unwrap();
    let state = create_test_app(&temp).await;

    commands::add_task(&state, &mut form("One")).await.unwrap();
    commands::add_task(&state, &mut form("Two")).await.unwrap();
    let before = commands::list_tasks(&state).await;

    let path = commands::export_tasks(&state, None).await.unwrap();
    assert!(path.starts_with(state.exports_dir()));

    for task in &before {
        commands::delete_task(&state, &task.id).await.unwrap();
    }
    assert!(commands::list_tasks(&state).await.is_empty());

    let count = commands::import_tasks(&state, &path).await.unwrap();
    assert_eq!(count, 2);
    assert_eq!(commands::list_tasks(&state).await, before);
}

#[tokio::test]
async fn test_malformed_import_keeps_existing_tasks() {
    let temp = TempDir::new().unwrap();
    let state = create_test_app(&temp).await;
    commands::add_task(&state, &mut form("Keep")).await.unwrap();
    let before = commands::list_tasks(&state).await;

    let bad = temp.path().join("broken.json");
    std::fs::write(&bad, "this is not a task list").unwrap();

    let result = commands::import_tasks(&state, &bad).await;
    match result {
        Err(AppError::Import(message)) => assert_eq!(message, "Invalid file format"),
        other => panic!("expected import error, got {:?}", other),
    }
    assert_eq!(commands::list_tasks(&state).await, before);
}

#[tokio::test]
async fn test_sign_in_unavailable_in_local_mode() {
    let temp = TempDir::new().unwrap();
    let state = create_test_app(&temp).await;

    assert!(commands::sign_in(&state, "a@b.test", "secret").await.is_err());
    assert!(commands::current_user(&state).await.is_none());
    assert_eq!(commands::get_app_info(&state).storage, "local");
}
