//! Events emitted to the UI shell
//!
//! Commands publish notifications and list-change signals here; the shell
//! subscribes and decides how to present them.

use serde::Serialize;
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Default,
    Destructive,
}

/// A transient user notification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: Variant,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum AppEvent {
    Notification(Notification),
    TasksChanged,
}

#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<AppEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.tx.subscribe()
    }

    pub fn emit(&self, event: AppEvent) {
        // No subscribers is not an error
        if self.tx.send(event).is_err() {
            tracing::trace!("Event dropped, no subscribers");
        }
    }

    pub fn notify(&self, title: &str, description: &str) {
        self.emit(AppEvent::Notification(Notification {
            title: title.to_string(),
            description: description.to_string(),
            variant: Variant::Default,
        }));
    }

    pub fn notify_error(&self, title: &str, description: &str) {
        self.emit(AppEvent::Notification(Notification {
            title: title.to_string(),
            description: description.to_string(),
            variant: Variant::Destructive,
        }));
    }

    pub fn tasks_changed(&self) {
        self.emit(AppEvent::TasksChanged);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_receive_events() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.notify_error("Error", "Failed to load tasks");
        bus.tasks_changed();

        match rx.recv().await.unwrap() {
            AppEvent::Notification(n) => {
                assert_eq!(n.description, "Failed to load tasks");
                assert_eq!(n.variant, Variant::Destructive);
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert_eq!(rx.recv().await.unwrap(), AppEvent::TasksChanged);
    }

    #[test]
    fn test_emit_without_subscribers() {
        EventBus::new().notify("Task added!", "Saved");
    }
}
