//! Commands exposed to the UI shell
//!
//! This module organizes commands into logical submodules:
//! - `tasks`: task listing, creation, completion, deletion and stats
//! - `transfer`: export and import of the on-device list
//! - `auth`: sign-up, sign-in and sign-out for remote storage
//!
//! All commands take the AppState first and report failures both as
//! notifications on the event bus and as their return value.

pub mod auth;
pub mod tasks;
pub mod transfer;

use crate::app::AppState;

pub use auth::*;
pub use tasks::*;
pub use transfer::*;

/// Get application information
pub fn get_app_info(state: &AppState) -> AppInfo {
    AppInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        app_data_dir: state.app_data_dir.to_string_lossy().to_string(),
        storage: state.store.kind().to_string(),
    }
}

/// Application information structure
#[derive(Debug, serde::Serialize)]
pub struct AppInfo {
    pub version: String,
    pub app_data_dir: String,
    pub storage: String,
}
