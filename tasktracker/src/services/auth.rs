//! Authentication service
//!
//! Signs users in and out against the backend auth API and keeps the
//! current session in device storage so it survives a restart.

use crate::backend::{error_message, BackendClient};
use crate::config;
use crate::database::Repository;
use crate::error::{AppError, Result};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Authenticated principal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Access token and identity returned by the auth API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: User,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshGrant<'a> {
    refresh_token: &'a str,
}

pub struct AuthService {
    client: BackendClient,
    repo: Repository,
    current: RwLock<Option<Session>>,
}

impl AuthService {
    pub fn new(client: BackendClient, repo: Repository) -> Self {
        Self {
            client,
            repo,
            current: RwLock::new(None),
        }
    }

    pub async fn current(&self) -> Option<Session> {
        self.current.read().await.clone()
    }

    /// Load the session saved by a previous run, if any
    pub async fn restore(&self) -> Result<Option<Session>> {
        let session = match self.repo.get_item(config::SESSION_STORAGE_KEY).await? {
            Some(document) => match serde_json::from_str::<Session>(&document) {
                Ok(session) => Some(session),
                Err(e) => {
                    tracing::warn!("Discarding unreadable stored session: {}", e);
                    self.repo.remove_item(config::SESSION_STORAGE_KEY).await?;
                    None
                }
            },
            None => None,
        };

        if let Some(s) = &session {
            tracing::info!("Restored session for user {}", s.user.id);
        }
        *self.current.write().await = session.clone();

        Ok(session)
    }

    /// Register a new account.
    ///
    /// Returns a session when the backend signs the user in immediately,
    /// `None` when the account still needs confirmation.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<Option<Session>> {
        tracing::info!("Signing up {}", email);

        let response = self
            .client
            .auth(Method::POST, "signup", None)
            .json(&Credentials { email, password })
            .send()
            .await
            .map_err(|e| AppError::Auth(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::Auth(error_message(response).await));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AppError::Auth(e.to_string()))?;

        match serde_json::from_value::<Session>(body) {
            Ok(session) => {
                self.store(Some(session.clone())).await?;
                Ok(Some(session))
            }
            Err(_) => {
                tracing::info!("Sign-up for {} awaits confirmation", email);
                Ok(None)
            }
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        tracing::info!("Signing in {}", email);

        let response = self
            .client
            .auth(Method::POST, "token", None)
            .query(&[("grant_type", "password")])
            .json(&Credentials { email, password })
            .send()
            .await
            .map_err(|e| AppError::Auth(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::Auth(error_message(response).await));
        }

        let session: Session = response
            .json()
            .await
            .map_err(|e| AppError::Auth(e.to_string()))?;

        self.store(Some(session.clone())).await?;
        tracing::info!("Signed in as user {}", session.user.id);

        Ok(session)
    }

    /// Exchange the refresh token for a new access token.
    ///
    /// On any failure the session is dropped and the user is signed out
    /// locally.
    pub async fn refresh(&self) -> Result<Session> {
        let Some(session) = self.current().await else {
            return Err(AppError::NotAuthenticated);
        };

        let result = match session.refresh_token.as_deref() {
            Some(token) => self.request_refresh(token).await,
            None => Err(AppError::Auth("session has no refresh token".to_string())),
        };

        match result {
            Ok(fresh) => {
                self.store(Some(fresh.clone())).await?;
                tracing::info!("Refreshed session for user {}", fresh.user.id);
                Ok(fresh)
            }
            Err(e) => {
                tracing::warn!("Session refresh failed for user {}: {}", session.user.id, e);
                self.store(None).await?;
                Err(e)
            }
        }
    }

    async fn request_refresh(&self, refresh_token: &str) -> Result<Session> {
        let response = self
            .client
            .auth(Method::POST, "token", None)
            .query(&[("grant_type", "refresh_token")])
            .json(&RefreshGrant { refresh_token })
            .send()
            .await
            .map_err(|e| AppError::Auth(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::Auth(error_message(response).await));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Auth(e.to_string()))
    }

    /// Sign out. The local session is always cleared; a backend failure
    /// is still reported.
    pub async fn sign_out(&self) -> Result<()> {
        let Some(session) = self.current().await else {
            return Ok(());
        };

        self.store(None).await?;

        let response = self
            .client
            .auth(Method::POST, "logout", Some(&session.access_token))
            .send()
            .await
            .map_err(|e| AppError::Auth(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::Auth(error_message(response).await));
        }

        tracing::info!("Signed out user {}", session.user.id);
        Ok(())
    }

    async fn store(&self, session: Option<Session>) -> Result<()> {
        match &session {
            Some(s) => {
                let document = serde_json::to_string(s)?;
                self.repo
                    .set_item(config::SESSION_STORAGE_KEY, &document)
                    .await?;
            }
            None => self.repo.remove_item(config::SESSION_STORAGE_KEY).await?,
        }
        *self.current.write().await = session;
        Ok(())
    }
}
