//! Application state and initialization
//!
//! This module manages the central application state and lifecycle.
//! All services are initialized here and made available through AppState.

use crate::backend::BackendClient;
use crate::config;
use crate::database::{create_pool, Repository};
use crate::error::{AppError, Result};
use crate::events::EventBus;
use crate::services::{
    AppSettings, AuthService, EnvironmentCollector, SettingsService, StorageMode,
    TaskFormController, TaskListPresenter, TransferService,
};
use crate::store::{LocalTaskStore, RemoteTaskStore, TaskStore};
use std::path::PathBuf;
use std::sync::Arc;

/// The storage variant the app was started with
#[derive(Clone)]
pub enum Backend {
    Local {
        store: Arc<LocalTaskStore>,
        transfer: TransferService,
    },
    Remote {
        store: Arc<RemoteTaskStore>,
        auth: Arc<AuthService>,
    },
}

/// Central application state holding all services
#[derive(Clone)]
pub struct AppState {
    pub app_data_dir: PathBuf,
    pub settings: AppSettings,
    pub settings_service: SettingsService,
    pub events: EventBus,
    pub store: Arc<dyn TaskStore>,
    pub backend: Backend,
    pub form_controller: Arc<TaskFormController>,
    pub presenter: TaskListPresenter,
}

impl AppState {
    /// Start from the settings file (plus environment overrides) in `app_data_dir`
    pub async fn initialize(app_data_dir: PathBuf) -> Result<Self> {
        let settings = SettingsService::new(app_data_dir.clone())
            .load_effective()
            .await?;
        Self::initialize_with(app_data_dir, settings, EnvironmentCollector::system()).await
    }

    pub async fn initialize_with(
        app_data_dir: PathBuf,
        settings: AppSettings,
        collector: EnvironmentCollector,
    ) -> Result<Self> {
        tracing::info!("Initializing application");
        tracing::info!("App data directory: {:?}", app_data_dir);

        std::fs::create_dir_all(&app_data_dir)?;
        std::fs::create_dir_all(app_data_dir.join("exports"))?;

        let pool = create_pool(&app_data_dir.join(config::STORAGE_DB_FILE)).await?;
        let repo = Repository::new(pool);

        let (store, backend): (Arc<dyn TaskStore>, Backend) = match settings.storage.mode {
            StorageMode::Local => {
                let store = Arc::new(LocalTaskStore::open(repo).await);
                let transfer = TransferService::new(store.clone());
                (store.clone() as Arc<dyn TaskStore>, Backend::Local { store, transfer })
            }
            StorageMode::Remote => {
                let url = settings.storage.backend_url.clone().ok_or_else(|| {
                    AppError::Config("Remote storage requires a backend URL".to_string())
                })?;
                let client =
                    BackendClient::new(url, settings.storage.api_key.clone().unwrap_or_default())?;

                let auth = Arc::new(AuthService::new(client.clone(), repo));
                let store = Arc::new(RemoteTaskStore::new(client).with_auth(auth.clone()));

                let session = auth.restore().await?;
                if let Err(e) = store.set_session(session).await {
                    tracing::warn!("Initial task load failed: {}", e);
                }

                (store.clone() as Arc<dyn TaskStore>, Backend::Remote { store, auth })
            }
        };

        tracing::info!("Using {} task store", store.kind());

        let form_controller = Arc::new(TaskFormController::new(store.clone(), collector));
        let presenter = TaskListPresenter::new(store.clone());

        tracing::info!("Application initialized successfully");

        Ok(Self {
            settings_service: SettingsService::new(app_data_dir.clone()),
            app_data_dir,
            settings,
            events: EventBus::new(),
            store,
            backend,
            form_controller,
            presenter,
        })
    }

    /// Import/export, available on the local store only
    pub fn transfer(&self) -> Result<&TransferService> {
        match &self.backend {
            Backend::Local { transfer, .. } => Ok(transfer),
            Backend::Remote { .. } => Err(AppError::Generic(
                "Import and export are only available for on-device storage".to_string(),
            )),
        }
    }

    /// Auth and the remote store, available in remote mode only
    pub fn remote(&self) -> Result<(&AuthService, &RemoteTaskStore)> {
        match &self.backend {
            Backend::Remote { store, auth } => Ok((auth.as_ref(), store.as_ref())),
            Backend::Local { .. } => Err(AppError::Generic(
                "Sign-in is only available with remote storage".to_string(),
            )),
        }
    }

    pub fn exports_dir(&self) -> PathBuf {
        self.app_data_dir.join("exports")
    }
}
