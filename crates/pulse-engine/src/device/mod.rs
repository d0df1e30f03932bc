pub mod classify;
pub mod info;
pub mod tracker;

pub use classify::{classify_device, compute_viewport, device_tier, Breakpoint, BreakpointTable};
pub use info::{
    DeviceInfo, DeviceProbe, DeviceSubtype, DeviceTier, DeviceType, Orientation, SafeArea,
    ViewportState,
};
pub use tracker::{ViewportConfig, ViewportTracker, ViewportTrigger};
