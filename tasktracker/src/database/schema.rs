//! Device storage schema
//!
//! Storage is a single key/value table. The schema version is kept in
//! SQLite's `user_version` pragma; step N upgrades version N-1 to N.

use crate::error::Result;
use sqlx::sqlite::SqlitePool;

const STORAGE_STEPS: &[&str] = &[
    // 1: one JSON document per key
    r#"
    CREATE TABLE IF NOT EXISTS storage (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
];

/// Bring the storage table up to the current schema version
pub async fn initialize_storage(pool: &SqlitePool) -> Result<()> {
    let version: i64 = sqlx::query_scalar("PRAGMA user_version")
        .fetch_one(pool)
        .await?;
    let target = STORAGE_STEPS.len() as i64;

    if version >= target {
        tracing::debug!("Device storage schema at version {}", version);
        return Ok(());
    }

    let mut tx = pool.begin().await?;
    for (index, step) in STORAGE_STEPS.iter().enumerate().skip(version as usize) {
        sqlx::query(*step).execute(&mut *tx).await?;
        tracing::info!("Device storage schema upgraded to version {}", index + 1);
    }
    let bump = format!("PRAGMA user_version = {}", target);
    sqlx::query(&bump).execute(&mut *tx).await?;
    tx.commit().await?;

    Ok(())
}
