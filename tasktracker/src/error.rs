//! Error types for the task tracker
//!
//! All errors use thiserror for structured error handling.
//! These errors can be serialized to a UI shell as plain strings.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Form input rejected before anything is collected or stored
    #[error("{0}")]
    Validation(String),

    /// Host device information could not be read
    #[error("Environment collection degraded: {0}")]
    CollectionDegraded(String),

    #[error("Failed to load tasks: {0}")]
    Fetch(String),

    #[error("Failed to save task: {0}")]
    Write(String),

    #[error("{0}")]
    Import(String),

    #[error("Failed to persist tasks: {0}")]
    Persist(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Not signed in")]
    NotAuthenticated,

    #[error("A task is already being submitted")]
    Busy,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Generic(String),
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
