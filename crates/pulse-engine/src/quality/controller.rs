// quality/controller.rs
//
// Adaptive quality controller: a feedback loop from performance samples to
// render settings.
//
// Each accepted sample is mapped to a candidate through a pure threshold
// ladder (`candidate_settings`). The controller only publishes when the
// candidate differs from what it holds. Severe pressure takes a separate,
// rate-limited emergency path that always wins over the ladder.

use serde::{Deserialize, Serialize};

use crate::core::time::Throttle;
use crate::device::DeviceTier;
use crate::events::{names, Channel, Event, EventRegistry, Receiver};
use crate::perf::PerformanceSample;
use super::settings::{QualityTier, RenderSettings};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    /// Below this the ladder drops to low.
    pub low_fps: f32,
    /// Below this the ladder caps at medium.
    pub medium_fps: f32,
    /// At or above this a high-tier device may step up to ultra.
    pub step_up_fps: f32,
    /// At or below this the emergency override fires.
    pub emergency_fps: f32,
    pub memory_warning_mb: f32,
    /// Fraction of `memory_warning_mb` at which particles and post-processing are cut.
    pub memory_pressure_ratio: f32,
    pub pressure_particle_cap: u32,
    pub sample_interval_ms: f64,
    pub emergency_cooldown_ms: f64,
    pub hidden_fps: u32,
    pub blurred_fps: u32,
    pub allow_ultra: bool,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            low_fps: 30.0,
            medium_fps: 45.0,
            step_up_fps: 58.0,
            emergency_fps: 20.0,
            memory_warning_mb: 512.0,
            memory_pressure_ratio: 0.8,
            pressure_particle_cap: 100,
            sample_interval_ms: 1_000.0,
            emergency_cooldown_ms: 5_000.0,
            hidden_fps: 10,
            blurred_fps: 15,
            allow_ultra: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeReason {
    Performance,
    MemoryPressure,
    Emergency,
    Visibility,
    Focus,
    Reset,
}

/// Published on `quality:changed`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityChange {
    pub previous: RenderSettings,
    pub current: RenderSettings,
    pub reason: ChangeReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityState {
    Nominal,
    DegradedMedium,
    DegradedLow,
    Emergency,
}

fn memory_pressured(sample: &PerformanceSample, config: &QualityConfig) -> bool {
    sample
        .memory_mb
        .is_some_and(|mb| mb > config.memory_warning_mb * config.memory_pressure_ratio)
}

fn is_emergency(sample: &PerformanceSample, config: &QualityConfig) -> bool {
    sample.fps <= config.emergency_fps
        || sample.memory_mb.is_some_and(|mb| mb > config.memory_warning_mb)
}

/// Pure mapping from one sample and the device tier to render settings.
/// Low FPS always dominates the device preference.
pub fn candidate_settings(
    sample: &PerformanceSample,
    device: DeviceTier,
    config: &QualityConfig,
) -> RenderSettings {
    let base = QualityTier::for_device(device);
    let tier = if sample.fps < config.low_fps {
        QualityTier::Low
    } else if sample.fps < config.medium_fps {
        base.min(QualityTier::Medium)
    } else if sample.fps >= config.step_up_fps && device == DeviceTier::High && config.allow_ultra {
        QualityTier::Ultra
    } else {
        base
    };

    let mut settings = RenderSettings::preset(tier);
    if memory_pressured(sample, config) {
        settings.particle_budget = settings.particle_budget.min(config.pressure_particle_cap);
        settings.post_processing = false;
    }
    settings
}

/// Owns the one live `RenderSettings`.
pub struct AdaptiveQualityController {
    config: QualityConfig,
    device: DeviceTier,
    /// Settings chosen by the ladder or the emergency path.
    ladder: RenderSettings,
    /// `ladder` with visibility/focus frame-rate overrides applied.
    current: RenderSettings,
    state: QualityState,
    sample_gate: Throttle,
    emergency_gate: Throttle,
    visible: bool,
    focused: bool,
    channel: Channel<QualityChange>,
}

impl AdaptiveQualityController {
    pub fn new(config: QualityConfig, device: DeviceTier) -> Self {
        let ladder = RenderSettings::for_device(device);
        let sample_gate = Throttle::new(config.sample_interval_ms);
        let emergency_gate = Throttle::new(config.emergency_cooldown_ms);
        Self {
            config,
            device,
            current: ladder.clone(),
            ladder,
            state: QualityState::Nominal,
            sample_gate,
            emergency_gate,
            visible: true,
            focused: true,
            channel: Channel::new(),
        }
    }

    pub fn subscribe(&mut self) -> Receiver<QualityChange> {
        self.channel.subscribe()
    }

    /// Snapshot of the live settings.
    pub fn current(&self) -> &RenderSettings {
        &self.current
    }

    pub fn state(&self) -> QualityState {
        self.state
    }

    pub fn device_tier(&self) -> DeviceTier {
        self.device
    }

    pub fn config(&self) -> &QualityConfig {
        &self.config
    }

    /// Feed one performance sample.
    pub fn on_sample(
        &mut self,
        sample: &PerformanceSample,
        bus: &mut EventRegistry,
    ) -> Option<QualityChange> {
        let now = sample.timestamp;

        if is_emergency(sample, &self.config) {
            if self.emergency_gate.try_fire(now) {
                log::warn!(
                    "quality: emergency override (fps {:.1}, memory {:?} MB)",
                    sample.fps,
                    sample.memory_mb
                );
                self.ladder = RenderSettings::emergency();
                self.state = QualityState::Emergency;
                return self.publish(ChangeReason::Emergency, bus);
            }
            // Cooling down: hold whatever the last override left in place.
            if self.state == QualityState::Emergency {
                return None;
            }
        }

        if !self.sample_gate.try_fire(now) {
            return None;
        }

        let candidate = candidate_settings(sample, self.device, &self.config);
        let base = QualityTier::for_device(self.device);
        self.state = match candidate.quality {
            q if q >= base => QualityState::Nominal,
            QualityTier::Low => QualityState::DegradedLow,
            _ => QualityState::DegradedMedium,
        };
        if candidate == self.ladder {
            return None;
        }

        let reason = if candidate.quality == self.ladder.quality && memory_pressured(sample, &self.config) {
            ChangeReason::MemoryPressure
        } else {
            ChangeReason::Performance
        };
        self.ladder = candidate;
        self.publish(reason, bus)
    }

    /// Page visibility changed. Hidden pages drop to `hidden_fps`; the quality
    /// fields are left alone.
    pub fn set_visible(&mut self, visible: bool, bus: &mut EventRegistry) -> Option<QualityChange> {
        if self.visible == visible {
            return None;
        }
        self.visible = visible;
        self.publish(ChangeReason::Visibility, bus)
    }

    /// Window focus changed. Blurred windows drop to `blurred_fps`.
    pub fn set_focused(&mut self, focused: bool, bus: &mut EventRegistry) -> Option<QualityChange> {
        if self.focused == focused {
            return None;
        }
        self.focused = focused;
        self.publish(ChangeReason::Focus, bus)
    }

    /// Return to the device default and forget throttling history.
    pub fn reset(&mut self, bus: &mut EventRegistry) -> Option<QualityChange> {
        self.ladder = RenderSettings::for_device(self.device);
        self.state = QualityState::Nominal;
        self.sample_gate.reset();
        self.emergency_gate.reset();
        self.publish(ChangeReason::Reset, bus)
    }

    fn effective(&self) -> RenderSettings {
        let mut settings = self.ladder.clone();
        if !self.visible {
            settings.target_fps = settings.target_fps.min(self.config.hidden_fps);
        } else if !self.focused {
            settings.target_fps = settings.target_fps.min(self.config.blurred_fps);
        }
        settings
    }

    fn publish(&mut self, reason: ChangeReason, bus: &mut EventRegistry) -> Option<QualityChange> {
        let next = self.effective();
        if next == self.current {
            return None;
        }
        let change = QualityChange {
            previous: std::mem::replace(&mut self.current, next),
            current: self.current.clone(),
            reason,
        };
        log::info!(
            "quality: {:?} -> {:?} @ {}fps ({:?})",
            change.previous.quality,
            change.current.quality,
            change.current.target_fps,
            reason
        );
        self.channel.send(change.clone());
        bus.emit(names::QUALITY_CHANGED, Event::QualityChanged(change.clone()));
        Some(change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(fps: f32, at: f64) -> PerformanceSample {
        PerformanceSample::new(fps, None, at)
    }

    fn controller(tier: DeviceTier) -> AdaptiveQualityController {
        AdaptiveQualityController::new(QualityConfig::default(), tier)
    }

    #[test]
    fn low_fps_dominates_device_tier() {
        let c = candidate_settings(&sample(25.0, 0.0), DeviceTier::High, &QualityConfig::default());
        assert_eq!(c.quality, QualityTier::Low);
    }

    #[test]
    fn mid_fps_caps_at_medium() {
        let config = QualityConfig::default();
        assert_eq!(
            candidate_settings(&sample(40.0, 0.0), DeviceTier::High, &config).quality,
            QualityTier::Medium
        );
        assert_eq!(
            candidate_settings(&sample(40.0, 0.0), DeviceTier::Low, &config).quality,
            QualityTier::Low
        );
    }

    #[test]
    fn ultra_needs_high_tier_and_opt_in() {
        let mut config = QualityConfig::default();
        assert_eq!(
            candidate_settings(&sample(60.0, 0.0), DeviceTier::High, &config).quality,
            QualityTier::High
        );
        config.allow_ultra = true;
        assert_eq!(
            candidate_settings(&sample(60.0, 0.0), DeviceTier::High, &config).quality,
            QualityTier::Ultra
        );
        assert_eq!(
            candidate_settings(&sample(60.0, 0.0), DeviceTier::Mid, &config).quality,
            QualityTier::Medium
        );
    }

    #[test]
    fn memory_pressure_clamps_particles_and_post() {
        let config = QualityConfig::default();
        let s = PerformanceSample::new(60.0, Some(450.0), 0.0);
        let c = candidate_settings(&s, DeviceTier::High, &config);
        assert_eq!(c.quality, QualityTier::High);
        assert_eq!(c.particle_budget, 100);
        assert!(!c.post_processing);
    }

    #[test]
    fn scenario_ladder() {
        let mut bus = EventRegistry::new();
        let rx = bus.stream(names::QUALITY_CHANGED);
        let mut q = controller(DeviceTier::High);
        let start = q.current().clone();

        assert!(q.on_sample(&sample(60.0, 1_000.0), &mut bus).is_none());
        assert_eq!(q.current(), &start);
        assert!(q.on_sample(&sample(58.0, 2_000.0), &mut bus).is_none());

        let c = q.on_sample(&sample(40.0, 3_000.0), &mut bus).unwrap();
        assert_eq!(c.current.quality, QualityTier::Medium);
        assert_eq!(c.previous.quality, QualityTier::High);
        assert_eq!(q.state(), QualityState::DegradedMedium);

        let c = q.on_sample(&sample(25.0, 4_000.0), &mut bus).unwrap();
        assert_eq!(c.current.quality, QualityTier::Low);
        assert_eq!(q.state(), QualityState::DegradedLow);

        let c = q.on_sample(&sample(20.0, 5_000.0), &mut bus).unwrap();
        assert_eq!(c.reason, ChangeReason::Emergency);
        assert_eq!(c.current.quality, QualityTier::Low);
        assert_eq!(q.state(), QualityState::Emergency);

        assert_eq!(rx.len(), 3);
    }

    #[test]
    fn emergency_is_throttled() {
        let mut bus = EventRegistry::new();
        let mut q = controller(DeviceTier::Mid);
        let rx = q.subscribe();
        q.on_sample(&sample(10.0, 1_000.0), &mut bus);
        q.on_sample(&sample(10.0, 2_000.0), &mut bus);
        let emergencies = rx
            .drain()
            .into_iter()
            .filter(|c| c.reason == ChangeReason::Emergency)
            .count();
        assert_eq!(emergencies, 1);
        assert_eq!(q.current(), &RenderSettings::emergency());
    }

    #[test]
    fn emergency_bypasses_sample_cadence() {
        let mut bus = EventRegistry::new();
        let mut q = controller(DeviceTier::High);
        q.on_sample(&sample(60.0, 1_000.0), &mut bus);
        let c = q.on_sample(&sample(5.0, 1_200.0), &mut bus).unwrap();
        assert_eq!(c.reason, ChangeReason::Emergency);
    }

    #[test]
    fn memory_over_warning_triggers_emergency() {
        let mut bus = EventRegistry::new();
        let mut q = controller(DeviceTier::High);
        let s = PerformanceSample::new(60.0, Some(600.0), 1_000.0);
        let c = q.on_sample(&s, &mut bus).unwrap();
        assert_eq!(c.reason, ChangeReason::Emergency);
    }

    #[test]
    fn recovers_after_emergency() {
        let mut bus = EventRegistry::new();
        let mut q = controller(DeviceTier::High);
        q.on_sample(&sample(10.0, 1_000.0), &mut bus);
        let c = q.on_sample(&sample(60.0, 2_000.0), &mut bus).unwrap();
        assert_eq!(c.current.quality, QualityTier::High);
        assert_eq!(q.state(), QualityState::Nominal);
    }

    #[test]
    fn identical_samples_do_not_republish() {
        let mut bus = EventRegistry::new();
        let mut q = controller(DeviceTier::High);
        let rx = q.subscribe();
        q.on_sample(&sample(40.0, 1_000.0), &mut bus);
        let first = q.current().clone();
        assert!(q.on_sample(&sample(40.0, 2_000.0), &mut bus).is_none());
        assert_eq!(q.current(), &first);
        assert_eq!(rx.len(), 1);
    }

    #[test]
    fn samples_inside_interval_are_skipped() {
        let mut bus = EventRegistry::new();
        let mut q = controller(DeviceTier::High);
        q.on_sample(&sample(60.0, 1_000.0), &mut bus);
        assert!(q.on_sample(&sample(40.0, 1_500.0), &mut bus).is_none());
        assert_eq!(q.current().quality, QualityTier::High);
    }

    #[test]
    fn hidden_page_lowers_target_fps_only() {
        let mut bus = EventRegistry::new();
        let mut q = controller(DeviceTier::High);
        let c = q.set_visible(false, &mut bus).unwrap();
        assert_eq!(c.reason, ChangeReason::Visibility);
        assert_eq!(c.current.target_fps, 10);
        assert_eq!(c.current.quality, QualityTier::High);
        assert_eq!(c.current.particle_budget, c.previous.particle_budget);
        assert!(q.set_visible(false, &mut bus).is_none());

        let c = q.set_visible(true, &mut bus).unwrap();
        assert_eq!(c.current.target_fps, 60);
    }

    #[test]
    fn blur_lowers_target_fps() {
        let mut bus = EventRegistry::new();
        let mut q = controller(DeviceTier::Mid);
        let c = q.set_focused(false, &mut bus).unwrap();
        assert_eq!(c.current.target_fps, 15);
        assert_eq!(c.reason, ChangeReason::Focus);
    }

    #[test]
    fn reset_restores_device_default() {
        let mut bus = EventRegistry::new();
        let mut q = controller(DeviceTier::High);
        q.on_sample(&sample(10.0, 1_000.0), &mut bus);
        let c = q.reset(&mut bus).unwrap();
        assert_eq!(c.current, RenderSettings::preset(QualityTier::High));
        assert_eq!(q.state(), QualityState::Nominal);
    }
}
