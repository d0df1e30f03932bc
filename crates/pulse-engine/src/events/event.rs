use serde::Serialize;

use crate::device::info::{DeviceInfo, ViewportState};
use crate::embed::message::HostMessage;
use crate::input::gesture::GestureEvent;
use crate::perf::sampler::PerformanceSample;
use crate::quality::controller::QualityChange;
use crate::ui::notify::{ModalRequest, Notification};

/// Everything that travels over the event registry.
/// Each stream name carries exactly one variant (see `EventRegistry::emit`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum Event {
    Gesture(GestureEvent),
    Performance(PerformanceSample),
    QualityChanged(QualityChange),
    DeviceChanged(DeviceInfo),
    ViewportChanged(ViewportState),
    Visibility { visible: bool },
    Focus { focused: bool },
    Notification(Notification),
    ModalRequest(ModalRequest),
    Embed(HostMessage),
    /// Payload-free trigger for app-defined streams ("coin_collected", ...).
    Signal,
    /// Numeric state slice for app-defined streams.
    Value(f64),
}

/// Discriminant of `Event`, used to pin a stream name to one payload shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Gesture,
    Performance,
    QualityChanged,
    DeviceChanged,
    ViewportChanged,
    Visibility,
    Focus,
    Notification,
    ModalRequest,
    Embed,
    Signal,
    Value,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Gesture(_) => EventKind::Gesture,
            Event::Performance(_) => EventKind::Performance,
            Event::QualityChanged(_) => EventKind::QualityChanged,
            Event::DeviceChanged(_) => EventKind::DeviceChanged,
            Event::ViewportChanged(_) => EventKind::ViewportChanged,
            Event::Visibility { .. } => EventKind::Visibility,
            Event::Focus { .. } => EventKind::Focus,
            Event::Notification(_) => EventKind::Notification,
            Event::ModalRequest(_) => EventKind::ModalRequest,
            Event::Embed(_) => EventKind::Embed,
            Event::Signal => EventKind::Signal,
            Event::Value(_) => EventKind::Value,
        }
    }

    /// Numeric view of the payload, for threshold monitors.
    pub fn as_value(&self) -> Option<f64> {
        match self {
            Event::Value(v) => Some(*v),
            Event::Performance(sample) => Some(sample.fps as f64),
            _ => None,
        }
    }
}

/// Well-known stream names published by the framework itself.
pub mod names {
    pub const PERFORMANCE: &str = "performance:sample";
    pub const QUALITY_CHANGED: &str = "quality:changed";
    pub const DEVICE_CHANGED: &str = "device:changed";
    pub const VIEWPORT_CHANGED: &str = "viewport:changed";
    pub const VISIBILITY: &str = "app:visibility";
    pub const FOCUS: &str = "app:focus";
    pub const NOTIFICATION: &str = "ui:notification";
    pub const MODAL: &str = "ui:modal";

    /// Per-type gesture stream, e.g. `gesture:double_tap`.
    pub fn gesture(kind: &str) -> String {
        format!("gesture:{kind}")
    }

    /// Per-type inbound embed stream, e.g. `embed:resize`.
    pub fn embed(kind: &str) -> String {
        format!("embed:{kind}")
    }
}
