//! Environment snapshot collection
//!
//! Reads device identifiers and capability flags from the host through a
//! [`DeviceProbe`]. Collection never fails: any probe error produces the
//! degraded fallback snapshot.

use crate::config;
use crate::database::{DeviceInfo, EnvironmentSnapshot};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use sysinfo::System;
use tokio::fs;

/// Source of host device information
#[async_trait]
pub trait DeviceProbe: Send + Sync {
    async fn device_info(&self) -> Result<DeviceInfo>;

    /// Whether the host exposes a geolocation capability
    async fn location_available(&self) -> Result<bool>;

    /// Whether the host exposes a battery status capability
    async fn battery_available(&self) -> Result<bool>;
}

/// Probe backed by the operating system
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProbe;

#[async_trait]
impl DeviceProbe for SystemProbe {
    async fn device_info(&self) -> Result<DeviceInfo> {
        let operating_system = System::name().ok_or_else(|| {
            AppError::CollectionDegraded("host did not report an OS name".to_string())
        })?;

        let model = match detect_model().await {
            Some(model) => model,
            None => System::host_name().unwrap_or_else(|| config::FALLBACK_MODEL.to_string()),
        };

        Ok(DeviceInfo {
            platform: std::env::consts::OS.to_string(),
            model,
            operating_system: Some(operating_system),
            os_version: System::os_version(),
            device_id: detect_device_id().await,
        })
    }

    async fn location_available(&self) -> Result<bool> {
        if cfg!(target_os = "macos") || cfg!(target_os = "ios") {
            return Ok(true);
        }
        if cfg!(target_os = "linux") {
            let geoclue =
                Path::new("/usr/share/dbus-1/system-services/org.freedesktop.GeoClue2.service");
            return Ok(fs::try_exists(geoclue).await?);
        }
        Ok(false)
    }

    async fn battery_available(&self) -> Result<bool> {
        if cfg!(target_os = "linux") || cfg!(target_os = "android") {
            return linux_has_battery().await;
        }
        if cfg!(target_os = "macos") {
            return Ok(run_cmd("pmset", &["-g", "batt"])
                .await
                .is_some_and(|out| out.contains("InternalBattery")));
        }
        Ok(false)
    }
}

async fn run_cmd(program: &str, args: &[&str]) -> Option<String> {
    let out = tokio::process::Command::new(program)
        .args(args)
        .output()
        .await
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let trimmed = String::from_utf8(out.stdout).ok()?.trim().to_string();
    (!trimmed.is_empty()).then_some(trimmed)
}

async fn read_trimmed(path: &str) -> Option<String> {
    let content = fs::read_to_string(path).await.ok()?;
    let trimmed = content.trim().to_string();
    (!trimmed.is_empty()).then_some(trimmed)
}

async fn detect_model() -> Option<String> {
    if cfg!(target_os = "linux") {
        return read_trimmed("/sys/class/dmi/id/product_name").await;
    }
    if cfg!(target_os = "macos") {
        return run_cmd("sysctl", &["-n", "hw.model"]).await;
    }
    None
}

async fn detect_device_id() -> Option<String> {
    if cfg!(target_os = "linux") {
        if let Some(id) = read_trimmed("/etc/machine-id").await {
            return Some(id);
        }
    }
    System::host_name()
}

async fn linux_has_battery() -> Result<bool> {
    let mut entries = match fs::read_dir("/sys/class/power_supply").await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e.into()),
    };

    while let Some(entry) = entries.next_entry().await? {
        let kind = fs::read_to_string(entry.path().join("type"))
            .await
            .unwrap_or_default();
        if kind.trim() == "Battery" {
            return Ok(true);
        }
    }
    Ok(false)
}

fn availability(available: bool) -> String {
    if available {
        config::AVAILABLE.to_string()
    } else {
        config::NOT_AVAILABLE.to_string()
    }
}

/// Collects environment snapshots for new tasks
#[derive(Clone)]
pub struct EnvironmentCollector {
    probe: Arc<dyn DeviceProbe>,
}

impl EnvironmentCollector {
    pub fn new(probe: Arc<dyn DeviceProbe>) -> Self {
        Self { probe }
    }

    /// Collector reading from the operating system
    pub fn system() -> Self {
        Self::new(Arc::new(SystemProbe))
    }

    /// Capture a snapshot, falling back to the degraded snapshot on any failure
    pub async fn collect(&self) -> EnvironmentSnapshot {
        match self.try_collect().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!("Using fallback environment snapshot: {}", e);
                Self::fallback()
            }
        }
    }

    async fn try_collect(&self) -> Result<EnvironmentSnapshot> {
        let device = self.probe.device_info().await?;
        let location = self.probe.location_available().await?;
        let battery = self.probe.battery_available().await?;

        tracing::debug!(
            "Collected environment: platform={} model={}",
            device.platform,
            device.model
        );

        Ok(EnvironmentSnapshot {
            device,
            timestamp: Utc::now(),
            location: availability(location),
            battery_level: availability(battery),
        })
    }

    /// Snapshot recorded when the host cannot be read
    pub fn fallback() -> EnvironmentSnapshot {
        EnvironmentSnapshot {
            device: DeviceInfo {
                platform: config::FALLBACK_PLATFORM.to_string(),
                model: config::FALLBACK_MODEL.to_string(),
                operating_system: None,
                os_version: None,
                device_id: None,
            },
            timestamp: Utc::now(),
            location: config::NOT_AVAILABLE.to_string(),
            battery_level: config::NOT_AVAILABLE.to_string(),
        }
    }
}
