//! Authentication commands
//!
//! Every identity change is handed to the remote store, which reloads the
//! task list for the new user.

use crate::app::AppState;
use crate::error::Result;
use crate::services::{Session, User};

async fn identity_changed(state: &AppState, session: Option<Session>) {
    let Ok((_, store)) = state.remote() else {
        return;
    };
    match store.set_session(session).await {
        Ok(_) => state.events.tasks_changed(),
        Err(e) => {
            tracing::error!("Error fetching tasks: {}", e);
            state.events.notify_error("Error", "Failed to load tasks");
        }
    }
}

pub async fn sign_in(state: &AppState, email: &str, password: &str) -> Result<Session> {
    let (auth, _) = state.remote()?;

    match auth.sign_in(email, password).await {
        Ok(session) => {
            identity_changed(state, Some(session.clone())).await;
            Ok(session)
        }
        Err(e) => {
            tracing::warn!("Sign-in failed: {}", e);
            state.events.notify_error("Error", &e.to_string());
            Err(e)
        }
    }
}

/// Returns the new session when the account is usable right away
pub async fn sign_up(state: &AppState, email: &str, password: &str) -> Result<Option<Session>> {
    let (auth, _) = state.remote()?;

    match auth.sign_up(email, password).await {
        Ok(Some(session)) => {
            identity_changed(state, Some(session.clone())).await;
            Ok(Some(session))
        }
        Ok(None) => {
            state.events.notify(
                "Check your email",
                "Confirm your address to finish signing up",
            );
            Ok(None)
        }
        Err(e) => {
            tracing::warn!("Sign-up failed: {}", e);
            state.events.notify_error("Error", &e.to_string());
            Err(e)
        }
    }
}

pub async fn sign_out(state: &AppState) -> Result<()> {
    let (auth, _) = state.remote()?;

    let result = auth.sign_out().await;
    identity_changed(state, None).await;

    match result {
        Ok(()) => {
            state
                .events
                .notify("Signed out", "You have been signed out successfully");
            Ok(())
        }
        Err(e) => {
            tracing::warn!("Sign-out failed: {}", e);
            state.events.notify_error("Error", "Failed to sign out");
            Err(e)
        }
    }
}

pub async fn current_user(state: &AppState) -> Option<User> {
    let (auth, _) = state.remote().ok()?;
    auth.current().await.map(|s| s.user)
}
