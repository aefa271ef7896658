//! Hosted task store.
//!
//! Reads and writes go to the backend `tasks` table, filtered by the
//! signed-in user. The local cache only changes after the backend has
//! acknowledged a write.

use super::TaskStore;
use crate::backend::{error_message, BackendClient};
use crate::config;
use crate::database::{Category, EnvironmentSnapshot, Task, TaskDraft};
use crate::error::{AppError, Result};
use crate::services::auth::{AuthService, Session};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// A row of the remote `tasks` table
#[derive(Debug, Clone, Deserialize)]
pub struct TaskRow {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Opaque JSON as stored by any client
    #[serde(default)]
    pub environment_data: Option<serde_json::Value>,
    pub user_id: String,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        let environment_data = row.environment_data.and_then(|value| {
            if value.is_null() {
                return None;
            }
            match serde_json::from_value::<EnvironmentSnapshot>(value) {
                Ok(snapshot) => Some(snapshot),
                Err(e) => {
                    tracing::warn!("Dropping malformed environment data on task {}: {}", row.id, e);
                    None
                }
            }
        });

        Task {
            id: row.id,
            title: row.title,
            description: row.description.filter(|d| !d.is_empty()),
            category: Category::General,
            completed: row.completed,
            created_at: row.created_at,
            environment_data,
        }
    }
}

#[derive(Serialize)]
struct NewTaskRow<'a> {
    title: &'a str,
    description: Option<&'a str>,
    environment_data: Option<&'a EnvironmentSnapshot>,
    user_id: &'a str,
    completed: bool,
}

pub struct RemoteTaskStore {
    client: BackendClient,
    auth: Option<Arc<AuthService>>,
    session: RwLock<Option<Session>>,
    tasks: RwLock<Vec<Task>>,
}

impl RemoteTaskStore {
    pub fn new(client: BackendClient) -> Self {
        Self {
            client,
            auth: None,
            session: RwLock::new(None),
            tasks: RwLock::new(Vec::new()),
        }
    }

    /// Refresh expired sessions through `auth`
    pub fn with_auth(mut self, auth: Arc<AuthService>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Switch identity and reload the list for the new user.
    pub async fn set_session(&self, session: Option<Session>) -> Result<Vec<Task>> {
        match &session {
            Some(s) => tracing::info!("Remote store identity changed to user {}", s.user.id),
            None => tracing::info!("Remote store signed out"),
        }
        *self.session.write().await = session;
        self.refresh().await
    }

    pub async fn session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    async fn require_session(&self) -> Result<Session> {
        self.session().await.ok_or(AppError::NotAuthenticated)
    }

    /// Send a table request. When the backend rejects the access token the
    /// session is refreshed once and the request rebuilt and resent; if the
    /// refresh fails the session and cached tasks are dropped and the
    /// rejection returned.
    async fn send<F>(&self, session: &Session, build: F) -> reqwest::Result<Response>
    where
        F: Fn(&Session) -> RequestBuilder + Send + Sync,
    {
        let response = build(session).send().await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }
        let Some(auth) = &self.auth else {
            return Ok(response);
        };

        tracing::info!("Access token rejected for user {}, refreshing", session.user.id);
        match auth.refresh().await {
            Ok(fresh) => {
                *self.session.write().await = Some(fresh.clone());
                build(&fresh).send().await
            }
            Err(e) => {
                tracing::warn!("Signing out after failed session refresh: {}", e);
                *self.session.write().await = None;
                self.tasks.write().await.clear();
                Ok(response)
            }
        }
    }
}

#[async_trait]
impl TaskStore for RemoteTaskStore {
    fn kind(&self) -> &'static str {
        "remote"
    }

    async fn list(&self) -> Result<Vec<Task>> {
        let Some(session) = self.session().await else {
            self.tasks.write().await.clear();
            return Ok(Vec::new());
        };

        let response = self
            .send(&session, |s| {
                self.client
                    .table(Method::GET, config::TASKS_TABLE, &s.access_token)
                    .query(&[
                        ("select", "*".to_string()),
                        ("user_id", format!("eq.{}", s.user.id)),
                        ("order", "created_at.desc".to_string()),
                    ])
            })
            .await
            .map_err(|e| AppError::Fetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::Fetch(error_message(response).await));
        }

        let rows: Vec<TaskRow> = response
            .json()
            .await
            .map_err(|e| AppError::Fetch(e.to_string()))?;

        let tasks: Vec<Task> = rows.into_iter().map(Task::from).collect();
        tracing::debug!("Fetched {} remote tasks", tasks.len());

        *self.tasks.write().await = tasks.clone();
        Ok(tasks)
    }

    async fn cached(&self) -> Vec<Task> {
        self.tasks.read().await.clone()
    }

    async fn create(&self, draft: TaskDraft) -> Result<Task> {
        let session = self.require_session().await?;

        let response = self
            .send(&session, |s| {
                let body = [NewTaskRow {
                    title: &draft.title,
                    description: draft.description.as_deref(),
                    environment_data: draft.environment_data.as_ref(),
                    user_id: &s.user.id,
                    completed: false,
                }];
                self.client
                    .table(Method::POST, config::TASKS_TABLE, &s.access_token)
                    .header("Prefer", "return=representation")
                    .query(&[("select", "*")])
                    .json(&body)
            })
            .await
            .map_err(|e| AppError::Write(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::Write(error_message(response).await));
        }

        let rows: Vec<TaskRow> = response
            .json()
            .await
            .map_err(|e| AppError::Write(e.to_string()))?;

        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Write("backend returned no row".to_string()))?;

        let mut task = Task::from(row);
        task.category = draft.category;

        self.tasks.write().await.insert(0, task.clone());
        tracing::info!("Created remote task: {}", task.id);

        Ok(task)
    }

    async fn set_completed(&self, id: &str, completed: bool) -> Result<()> {
        if !self.tasks.read().await.iter().any(|t| t.id == id) {
            tracing::debug!("Ignoring completion change for uncached task: {}", id);
            return Ok(());
        }

        let session = self.require_session().await?;

        let response = self
            .send(&session, |s| {
                self.client
                    .table(Method::PATCH, config::TASKS_TABLE, &s.access_token)
                    .query(&[
                        ("id", format!("eq.{}", id)),
                        ("user_id", format!("eq.{}", s.user.id)),
                    ])
                    .json(&serde_json::json!({ "completed": completed }))
            })
            .await
            .map_err(|e| AppError::Write(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::Write(error_message(response).await));
        }

        if let Some(task) = self.tasks.write().await.iter_mut().find(|t| t.id == id) {
            task.completed = completed;
        }

        tracing::debug!("Set remote task {} completed={}", id, completed);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let session = self.require_session().await?;

        let response = self
            .send(&session, |s| {
                self.client
                    .table(Method::DELETE, config::TASKS_TABLE, &s.access_token)
                    .query(&[
                        ("id", format!("eq.{}", id)),
                        ("user_id", format!("eq.{}", s.user.id)),
                    ])
            })
            .await
            .map_err(|e| AppError::Write(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::Write(error_message(response).await));
        }

        self.tasks.write().await.retain(|t| t.id != id);
        tracing::info!("Deleted remote task: {}", id);

        Ok(())
    }
}
