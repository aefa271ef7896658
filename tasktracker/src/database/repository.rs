//! Repository layer for device storage
//!
//! A small key/value store: each key holds one serialized document
//! which is overwritten as a whole on every write.

use crate::error::Result;
use chrono::Utc;
use sqlx::SqlitePool;

/// Repository for device storage operations
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Read the document stored under `key`
    pub async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM storage WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(value)
    }

    /// Overwrite the document stored under `key`
    pub async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO storage (key, value, updated_at) VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        tracing::debug!("Stored item: {} ({} bytes)", key, value.len());
        Ok(())
    }

    /// Remove the document stored under `key`
    pub async fn remove_item(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM storage WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;

        tracing::debug!("Removed item: {}", key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::schema::initialize_storage;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn create_test_repo() -> Repository {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        initialize_storage(&pool).await.unwrap();

        Repository::new(pool)
    }

    #[tokio::test]
    async fn test_missing_item_is_none() {
        let repo = create_test_repo().await;

        assert_eq!(repo.get_item("tasks").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_overwrites_item() {
        let repo = create_test_repo().await;

        repo.set_item("tasks", "[]").await.unwrap();
        repo.set_item("tasks", r#"[{"id":"1"}]"#).await.unwrap();

        let value = repo.get_item("tasks").await.unwrap();
        assert_eq!(value.as_deref(), Some(r#"[{"id":"1"}]"#));
    }

    #[tokio::test]
    async fn test_remove_item() {
        let repo = create_test_repo().await;

        repo.set_item("auth_session", "{}").await.unwrap();
        repo.remove_item("auth_session").await.unwrap();

        assert_eq!(repo.get_item("auth_session").await.unwrap(), None);

        // Removing again is harmless
        repo.remove_item("auth_session").await.unwrap();
    }
}
