use serde::Serialize;

use crate::events::{names, Event, EventRegistry};

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyLevel {
    Info,
    Success,
    Warn,
    Error,
}

/// A toast for the external UI layer to show.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub id: u64,
    pub level: NotifyLevel,
    pub message: String,
    pub duration_ms: f64,
}

/// Ask the UI layer to open a dialog. Rendering and button handling are external.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModalRequest {
    pub id: String,
    pub title: String,
    pub body: Option<String>,
    pub actions: Vec<String>,
}

/// Publishes notification and modal requests on the registry.
#[derive(Debug)]
pub struct Notifier {
    next_id: u64,
    default_duration_ms: f64,
}

impl Notifier {
    pub fn new(default_duration_ms: f64) -> Self {
        Self {
            next_id: 1,
            default_duration_ms,
        }
    }

    pub fn notify(&mut self, bus: &mut EventRegistry, level: NotifyLevel, message: &str) -> u64 {
        let duration = self.default_duration_ms;
        self.notify_for(bus, level, message, duration)
    }

    pub fn notify_for(
        &mut self,
        bus: &mut EventRegistry,
        level: NotifyLevel,
        message: &str,
        duration_ms: f64,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        bus.emit(
            names::NOTIFICATION,
            Event::Notification(Notification {
                id,
                level,
                message: message.to_string(),
                duration_ms,
            }),
        );
        id
    }

    pub fn request_modal(&mut self, bus: &mut EventRegistry, request: ModalRequest) {
        log::debug!("ui: modal '{}' requested", request.id);
        bus.emit(names::MODAL, Event::ModalRequest(request));
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(3_000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notifications_get_increasing_ids() {
        let mut bus = EventRegistry::new();
        let rx = bus.stream(names::NOTIFICATION);
        let mut n = Notifier::default();
        let a = n.notify(&mut bus, NotifyLevel::Info, "saved");
        let b = n.notify(&mut bus, NotifyLevel::Warn, "low battery");
        assert!(b > a);
        let events = rx.drain();
        assert_eq!(events.len(), 2);
        match &events[0] {
            Event::Notification(note) => {
                assert_eq!(note.message, "saved");
                assert_eq!(note.duration_ms, 3_000.0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn modal_request_is_published() {
        let mut bus = EventRegistry::new();
        let rx = bus.stream(names::MODAL);
        let mut n = Notifier::default();
        n.request_modal(
            &mut bus,
            ModalRequest {
                id: "quit".into(),
                title: "Leave the game?".into(),
                body: None,
                actions: vec!["stay".into(), "leave".into()],
            },
        );
        assert_eq!(rx.len(), 1);
    }
}
