//! Services module
//!
//! Business logic services that coordinate between commands and the stores.

pub mod auth;
pub mod environment;
pub mod presenter;
pub mod settings;
pub mod tasks;
pub mod transfer;

pub use auth::{AuthService, Session, User};
pub use environment::{DeviceProbe, EnvironmentCollector, SystemProbe};
pub use presenter::{TaskListPresenter, TaskListView, TaskStats};
pub use settings::{AppSettings, SettingsService, StorageMode, StorageSettings};
pub use tasks::{TaskForm, TaskFormController};
pub use transfer::TransferService;
