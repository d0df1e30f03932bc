use serde::{Deserialize, Serialize};

use crate::core::time::Debouncer;
use crate::events::{names, Event, EventRegistry};
use super::classify::{classify_device, compute_viewport, BreakpointTable};
use super::info::{DeviceInfo, DeviceProbe, ViewportState};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub breakpoints: BreakpointTable,
    /// Resolution the game is authored for; drives `ViewportState::scale`.
    pub design_width: f32,
    pub design_height: f32,
    /// Quiet period before a burst of resize notifications is acted on.
    pub debounce_ms: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            breakpoints: BreakpointTable::default(),
            design_width: 1280.0,
            design_height: 720.0,
            debounce_ms: 50.0,
        }
    }
}

/// What the host saw change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportTrigger {
    Resize,
    OrientationChange,
    FullscreenChange,
}

/// Holds the current device/viewport snapshots and re-derives them after
/// resize bursts settle.
pub struct ViewportTracker {
    config: ViewportConfig,
    device: DeviceInfo,
    viewport: ViewportState,
    pending: Debouncer<DeviceProbe>,
}

impl ViewportTracker {
    /// Classify once from the startup probe.
    pub fn new(config: ViewportConfig, probe: &DeviceProbe) -> Self {
        let device = classify_device(probe);
        let viewport = compute_viewport(
            probe,
            &device,
            &config.breakpoints,
            (config.design_width, config.design_height),
        );
        log::info!(
            "device: {:?}/{:?} tier={:?} breakpoint={} {:?}",
            device.device_type,
            device.subtype,
            device.tier,
            viewport.breakpoint,
            viewport.orientation
        );
        let pending = Debouncer::new(config.debounce_ms);
        Self {
            config,
            device,
            viewport,
            pending,
        }
    }

    pub fn device(&self) -> &DeviceInfo {
        &self.device
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    /// Record a host notification. Work happens in `tick` once the burst settles.
    pub fn notify(&mut self, trigger: ViewportTrigger, probe: DeviceProbe, now: f64) {
        log::trace!("viewport: {:?} at {:.0}ms", trigger, now);
        self.pending.push(probe, now);
    }

    /// Re-classify if a settled probe is waiting. Publishes and returns the new
    /// viewport only when the breakpoint or orientation changed.
    pub fn tick(&mut self, now: f64, bus: &mut EventRegistry) -> Option<ViewportState> {
        let probe = self.pending.poll(now)?;
        let device = classify_device(&probe);
        let viewport = compute_viewport(
            &probe,
            &device,
            &self.config.breakpoints,
            (self.config.design_width, self.config.design_height),
        );

        let changed = viewport.breakpoint != self.viewport.breakpoint
            || viewport.orientation != self.viewport.orientation;
        self.device = device;
        self.viewport = viewport;

        if !changed {
            return None;
        }
        log::debug!(
            "viewport: now {} {:?} ({}x{})",
            self.viewport.breakpoint,
            self.viewport.orientation,
            self.viewport.width,
            self.viewport.height
        );
        bus.emit(names::DEVICE_CHANGED, Event::DeviceChanged(self.device.clone()));
        bus.emit(names::VIEWPORT_CHANGED, Event::ViewportChanged(self.viewport.clone()));
        Some(self.viewport.clone())
    }
}
