//! Import/export commands

use crate::app::AppState;
use crate::error::{AppError, Result};
use std::path::{Path, PathBuf};

/// Export all tasks as a dated JSON document.
///
/// Writes into `dir`, or the app's exports directory when none is given.
pub async fn export_tasks(state: &AppState, dir: Option<&Path>) -> Result<PathBuf> {
    let transfer = state.transfer()?;
    let dir = dir.map(Path::to_path_buf).unwrap_or_else(|| state.exports_dir());

    match transfer.export_to_dir(&dir).await {
        Ok(path) => {
            state
                .events
                .notify("Export complete", "Your tasks have been exported");
            Ok(path)
        }
        Err(e) => {
            tracing::error!("Error exporting tasks: {}", e);
            state.events.notify_error("Error", "Failed to export tasks");
            Err(e)
        }
    }
}

/// Replace all tasks with the contents of an exported document
pub async fn import_tasks(state: &AppState, path: &Path) -> Result<usize> {
    let transfer = state.transfer()?;

    match transfer.import_file(path).await {
        Ok(count) => {
            state.events.notify(
                "Import complete",
                &format!("Imported {} tasks", count),
            );
            state.events.tasks_changed();
            Ok(count)
        }
        Err(AppError::Import(message)) => {
            state.events.notify_error("Import failed", &message);
            Err(AppError::Import(message))
        }
        Err(e) => {
            tracing::error!("Error importing tasks from {:?}: {}", path, e);
            state.events.notify_error("Import failed", "Could not read the file");
            Err(e)
        }
    }
}
