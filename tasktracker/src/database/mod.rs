//! Device storage
//!
//! - `models`: task and snapshot types
//! - `repository`: key/value documents backing the local task list and session
//! - `schema`: storage table versioning

pub mod models;
pub mod repository;
pub mod schema;

pub use models::*;
pub use repository::Repository;
pub use schema::initialize_storage;

use crate::error::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;

const MAX_CONNECTIONS: u32 = 4;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open the storage file at `db_path`, creating it when missing, and make
/// sure the schema is current.
pub async fn create_pool(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);

    let pool = SqlitePoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect_with(options)
        .await?;

    initialize_storage(&pool).await?;
    tracing::info!("Device storage ready at {:?}", db_path);

    Ok(pool)
}
