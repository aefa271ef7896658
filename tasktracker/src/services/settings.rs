//! Settings service
//!
//! Manages application settings persistence using JSON file storage.
//! The backend endpoint and key can be overridden from the environment.

use crate::config;
use crate::database::Category;
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;

/// Where tasks are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    #[default]
    Local,
    Remote,
}

/// Storage backend configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StorageSettings {
    #[serde(default)]
    pub mode: StorageMode,
    /// Base URL of the hosted backend (remote mode only)
    #[serde(default)]
    pub backend_url: Option<String>,
    /// Project API key sent with every backend request
    #[serde(default)]
    pub api_key: Option<String>,
}

impl StorageSettings {
    /// Apply environment overrides for endpoint and key
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(config::BACKEND_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.backend_url = Some(url);
        }
        if let Some(key) = lookup(config::API_KEY_ENV).filter(|v| !v.trim().is_empty()) {
            self.api_key = Some(key);
        }
        self
    }
}

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppSettings {
    #[serde(default)]
    pub storage: StorageSettings,
    /// Category preselected on a fresh form
    #[serde(default)]
    pub default_category: Category,
}

/// Service for managing application settings
#[derive(Clone)]
pub struct SettingsService {
    settings_path: PathBuf,
}

impl SettingsService {
    pub fn new(app_data_dir: PathBuf) -> Self {
        Self {
            settings_path: app_data_dir.join(config::SETTINGS_FILE),
        }
    }

    /// Load settings from disk or create default if not exists
    pub async fn load(&self) -> Result<AppSettings> {
        if !fs::try_exists(&self.settings_path).await? {
            tracing::info!("Settings file not found, creating default settings");
            let default = AppSettings::default();
            self.save(&default).await?;
            return Ok(default);
        }

        let content = fs::read_to_string(&self.settings_path).await?;
        let settings: AppSettings = serde_json::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse settings: {}", e)))?;

        Ok(settings)
    }

    /// Load settings with environment overrides applied
    pub async fn load_effective(&self) -> Result<AppSettings> {
        let mut settings = self.load().await?;
        settings.storage = settings
            .storage
            .with_overrides(|name| std::env::var(name).ok());
        Ok(settings)
    }

    /// Save settings to disk
    pub async fn save(&self, settings: &AppSettings) -> Result<()> {
        let content = serde_json::to_string_pretty(settings)?;

        if let Some(parent) = self.settings_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&self.settings_path, content).await?;
        tracing::info!("Settings saved to {:?}", self.settings_path);

        Ok(())
    }

    /// Update storage settings. Takes effect on next start.
    pub async fn update_storage(&self, storage: StorageSettings) -> Result<()> {
        let mut settings = self.load().await?;
        settings.storage = storage;
        self.save(&settings).await
    }

    pub async fn update_default_category(&self, category: Category) -> Result<()> {
        let mut settings = self.load().await?;
        settings.default_category = category;
        self.save(&settings).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_service() -> (SettingsService, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let service = SettingsService::new(temp_dir.path().to_path_buf());
        (service, temp_dir)
    }

    #[tokio::test]
    async fn test_default_settings_created_on_load() {
        let (service, temp) = create_test_service();

        let settings = service.load().await.unwrap();

        assert_eq!(settings.storage.mode, StorageMode::Local);
        assert_eq!(settings.storage.backend_url, None);
        assert_eq!(settings.default_category, Category::General);
        assert!(temp.path().join("settings.json").exists());
    }

    #[tokio::test]
    async fn test_settings_persistence() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().to_path_buf();

        {
            let service = SettingsService::new(dir.clone());
            service
                .update_storage(StorageSettings {
                    mode: StorageMode::Remote,
                    backend_url: Some("https://backend.test".to_string()),
                    api_key: Some("anon".to_string()),
                })
                .await
                .unwrap();
            service
                .update_default_category(Category::Work)
                .await
                .unwrap();
        }

        let service = SettingsService::new(dir);
        let loaded = service.load().await.unwrap();
        assert_eq!(loaded.storage.mode, StorageMode::Remote);
        assert_eq!(loaded.storage.backend_url.as_deref(), Some("https://backend.test"));
        assert_eq!(loaded.default_category, Category::Work);
    }

    #[tokio::test]
    async fn test_partial_settings_use_defaults() {
        let (service, temp) = create_test_service();
        std::fs::write(
            temp.path().join("settings.json"),
            r#"{"storage":{"mode":"remote"}}"#,
        )
        .unwrap();

        let settings = service.load().await.unwrap();
        assert_eq!(settings.storage.mode, StorageMode::Remote);
        assert_eq!(settings.storage.api_key, None);
        assert_eq!(settings.default_category, Category::General);
    }

    #[tokio::test]
    async fn test_malformed_settings_rejected() {
        let (service, temp) = create_test_service();
        std::fs::write(temp.path().join("settings.json"), "not json").unwrap();

        assert!(matches!(service.load().await, Err(AppError::Config(_))));
    }

    #[test]
    fn test_environment_overrides() {
        let storage = StorageSettings {
            mode: StorageMode::Remote,
            backend_url: Some("https://file.test".to_string()),
            api_key: Some("file-key".to_string()),
        };

        let overridden = storage.with_overrides(|name| match name {
            "TASKTRACKER_BACKEND_URL" => Some("https://env.test".to_string()),
            "TASKTRACKER_API_KEY" => Some("  ".to_string()),
            _ => None,
        });

        assert_eq!(overridden.backend_url.as_deref(), Some("https://env.test"));
        assert_eq!(overridden.api_key.as_deref(), Some("file-key"));
    }
}
