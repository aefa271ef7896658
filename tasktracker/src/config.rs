//! Application configuration constants
//!
//! Central location for storage keys, fallback values and
//! user-facing strings shared across the application.

// ===== Device Storage =====

/// Device storage key holding the serialized task list
pub const TASKS_STORAGE_KEY: &str = "tasks";

/// Device storage key holding the signed-in session
pub const SESSION_STORAGE_KEY: &str = "auth_session";

/// File name of the device storage database inside the data directory
pub const STORAGE_DB_FILE: &str = "storage.sqlite";

/// File name of the settings document inside the data directory
pub const SETTINGS_FILE: &str = "settings.json";

// ===== Remote Backend =====

/// Remote table holding tasks
pub const TASKS_TABLE: &str = "tasks";

/// Path prefix of the REST table API
pub const REST_PATH: &str = "/rest/v1";

/// Path prefix of the auth API
pub const AUTH_PATH: &str = "/auth/v1";

/// Environment variable overriding the backend endpoint
pub const BACKEND_URL_ENV: &str = "TASKTRACKER_BACKEND_URL";

/// Environment variable overriding the backend API key
pub const API_KEY_ENV: &str = "TASKTRACKER_API_KEY";

// ===== Environment Snapshot =====

/// Capability string recorded when the host exposes the capability
pub const AVAILABLE: &str = "Available";

/// Capability string recorded when the host lacks the capability
pub const NOT_AVAILABLE: &str = "Not available";

/// Platform recorded when device information cannot be read
pub const FALLBACK_PLATFORM: &str = "web";

/// Model recorded when device information cannot be read
pub const FALLBACK_MODEL: &str = "unknown";

// ===== Import / Export =====

/// Prefix of exported documents, followed by the ISO date
pub const EXPORT_FILE_PREFIX: &str = "tasks_";

/// Extension of exported documents
pub const EXPORT_FILE_EXTENSION: &str = "json";

/// Message reported when an import document cannot be parsed
pub const INVALID_FILE_FORMAT: &str = "Invalid file format";

// ===== Presentation =====

/// Validation message for an empty title
pub const TITLE_REQUIRED: &str = "Please enter a task title";

pub const EMPTY_LIST_TITLE: &str = "No tasks yet";
pub const EMPTY_LIST_HINT: &str = "Add your first task to get started!";

/// Creation date format used on task cards (e.g. "Oct 19, 2026, 3:04 PM")
pub const CARD_DATE_FORMAT: &str = "%b %-d, %Y, %-I:%M %p";
