pub mod api;
pub mod core;
pub mod events;
pub mod input;
pub mod device;
pub mod perf;
pub mod quality;
pub mod save;
pub mod embed;
pub mod ui;
pub mod bridge;

// Re-export key types at crate root for convenience
pub use api::config::FrameworkConfig;
pub use api::game::{FrameworkContext, Game};
pub use core::time::{Debouncer, Throttle};
pub use core::timer::{TimerId, TimerQueue};
pub use events::{
    names, Channel, Crossing, DoubleTrigger, Event, EventKind, EventRegistry, Receiver,
    StreakCounter, ThresholdMonitor,
};
pub use input::gesture::{
    Gesture, GestureConfig, GestureEvent, GestureRecognizer, SwipeDirection, TouchPoint, Zoom,
};
pub use input::queue::{InputEvent, InputQueue};
pub use device::{
    classify_device, compute_viewport, device_tier, BreakpointTable, DeviceInfo, DeviceProbe,
    DeviceTier, DeviceType, Orientation, ViewportConfig, ViewportState, ViewportTracker,
    ViewportTrigger,
};
pub use perf::{MemoryProbe, NoMemoryProbe, PerformanceSample, PerformanceSampler, SamplerConfig};
pub use quality::{
    AdaptiveQualityController, ChangeReason, QualityChange, QualityConfig, QualityState,
    QualityTier, RenderSettings, ShadowTier,
};
pub use save::{MemoryStore, SaveConfig, SaveEnvelope, SaveError, SaveManager, SaveStore};
pub use embed::{EmbedChannel, EmbedConfig, EmbedMessage, HostMessage};
pub use ui::{ModalRequest, Notification, Notifier, NotifyLevel};
pub use bridge::protocol::{SettingsWire, SETTINGS_FLOATS};
