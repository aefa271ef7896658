// Task tracker headless host
// Initializes logging, bootstraps the application core and reports the
// loaded task list. UI shells embed the library and drive the commands.

use anyhow::Context;
use std::path::PathBuf;
use tasktracker::app::AppState;
use tasktracker::commands;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn app_data_dir() -> anyhow::Result<PathBuf> {
    let base = dirs::data_dir().context("No data directory available on this host")?;
    Ok(base.join("tasktracker"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tasktracker=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting task tracker");

    let state = AppState::initialize(app_data_dir()?)
        .await
        .context("Failed to initialize application")?;

    let info = commands::get_app_info(&state);
    tracing::info!(
        "Task tracker {} using {} storage at {}",
        info.version,
        info.storage,
        info.app_data_dir
    );

    if let Some(user) = commands::current_user(&state).await {
        tracing::info!("Signed in as {}", user.email.as_deref().unwrap_or(&user.id));
    }

    let stats = commands::get_stats(&state).await;
    tracing::info!(
        "{} tasks: {} completed, {} pending ({}% done)",
        stats.total,
        stats.completed,
        stats.pending,
        stats.success_rate
    );

    Ok(())
}
