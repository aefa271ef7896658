//! Task models
//!
//! Rust structs representing the task entity and its environment snapshot.
//! All models use serde; the serialized shape is the one stored on the
//! device and written to export documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Task category chosen on the form.
///
/// Unknown or null labels read back as `General`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum Category {
    #[default]
    General,
    Work,
    Personal,
    Urgent,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::General,
        Category::Work,
        Category::Personal,
        Category::Urgent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::General => "General",
            Category::Work => "Work",
            Category::Personal => "Personal",
            Category::Urgent => "Urgent",
        }
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(label) = Option::<String>::deserialize(deserializer)? else {
            return Ok(Category::General);
        };

        match Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(label.trim()))
        {
            Some(category) => Ok(category),
            None => {
                tracing::warn!("Unknown task category {:?}, using General", label);
                Ok(Category::General)
            }
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifiers read from the host device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    pub platform: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operating_system: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
}

/// Point-in-time device metadata captured when a task is created.
///
/// `location` and `battery_level` hold availability strings, never readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentSnapshot {
    pub device: DeviceInfo,
    pub timestamp: DateTime<Utc>,
    pub location: String,
    pub battery_level: String,
}

/// A tracked task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment_data: Option<EnvironmentSnapshot>,
}

/// Fields supplied by the form; the store assigns id and creation time
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub category: Category,
    pub environment_data: Option<EnvironmentSnapshot>,
}

impl TaskDraft {
    /// Build a task from this draft with store-assigned identity
    pub fn into_task(self, id: String, created_at: DateTime<Utc>) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            category: self.category,
            completed: false,
            created_at,
            environment_data: self.environment_data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_serializes_camel_case() {
        let task = TaskDraft {
            title: "Buy milk".to_string(),
            description: None,
            category: Category::Personal,
            environment_data: None,
        }
        .into_task("1700000000000".to_string(), Utc::now());

        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["category"], "Personal");
        assert_eq!(value["completed"], false);
        assert!(value.get("createdAt").is_some());
        assert!(value.get("description").is_none());
        assert!(value.get("environmentData").is_none());
    }

    #[test]
    fn test_task_missing_category_defaults_to_general() {
        let json = r#"{"id":"1","title":"Old task","completed":true,"createdAt":"2024-01-01T00:00:00Z"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.category, Category::General);
        assert!(task.completed);
    }

    #[test]
    fn test_unknown_category_reads_as_general() {
        let json = r#"[
            {"id":"1","title":"a","category":"Errands","createdAt":"2024-01-01T00:00:00Z"},
            {"id":"2","title":"b","category":null,"createdAt":"2024-01-01T00:00:00Z"},
            {"id":"3","title":"c","category":"work","createdAt":"2024-01-01T00:00:00Z"}
        ]"#;
        let tasks: Vec<Task> = serde_json::from_str(json).unwrap();

        let categories: Vec<Category> = tasks.iter().map(|t| t.category).collect();
        assert_eq!(
            categories,
            vec![Category::General, Category::General, Category::Work]
        );
    }

    #[test]
    fn test_snapshot_field_names() {
        let json = r#"{
            "device": {"platform": "android", "model": "Pixel 8", "osVersion": "14", "deviceId": "abc"},
            "timestamp": "2024-05-01T10:00:00Z",
            "location": "Available",
            "batteryLevel": "Not available"
        }"#;
        let snapshot: EnvironmentSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.device.model, "Pixel 8");
        assert_eq!(snapshot.device.os_version.as_deref(), Some("14"));
        assert_eq!(snapshot.device.operating_system, None);
        assert_eq!(snapshot.battery_level, "Not available");
    }
}
