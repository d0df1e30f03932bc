use glam::Vec2;

use crate::api::config::FrameworkConfig;
use crate::bridge::protocol::SettingsWire;
use crate::device::{DeviceProbe, ViewportTracker, ViewportTrigger};
use crate::embed::{EmbedChannel, EmbedMessage, HostMessage};
use crate::events::{names, Event, EventRegistry};
use crate::input::gesture::GestureRecognizer;
use crate::input::queue::{InputEvent, InputQueue};
use crate::perf::{MemoryProbe, PerformanceSampler};
use crate::quality::{AdaptiveQualityController, QualityChange};
use crate::save::SaveConfig;
use crate::ui::Notifier;

/// The core contract every game must fulfill.
pub trait Game {
    /// Return framework configuration. Called once before init.
    fn config(&self) -> FrameworkConfig {
        FrameworkConfig::default()
    }

    /// Subscribe to streams, load saves, set up state.
    fn init(&mut self, ctx: &mut FrameworkContext);

    /// Called once per animation frame after input and sampling were processed.
    /// `dt` is the elapsed time since the previous frame, in seconds.
    fn update(&mut self, ctx: &mut FrameworkContext, dt: f32);

    /// Render settings changed. The new values are already in `ctx.settings()`.
    fn on_quality_change(&mut self, _ctx: &mut FrameworkContext, _change: &QualityChange) {}
}

/// Mutable access to framework state, passed to `Game::init` and `Game::update`.
pub struct FrameworkContext {
    pub bus: EventRegistry,
    pub gestures: GestureRecognizer,
    pub viewport: ViewportTracker,
    pub sampler: PerformanceSampler,
    pub quality: AdaptiveQualityController,
    pub embed: EmbedChannel,
    pub notifier: Notifier,
    pub save_config: SaveConfig,
    input: InputQueue,
    changes: Vec<QualityChange>,
    revision: u32,
    visible: bool,
    focused: bool,
    now: f64,
}

impl FrameworkContext {
    pub fn new(config: FrameworkConfig, probe: &DeviceProbe) -> Self {
        let viewport = ViewportTracker::new(config.viewport, probe);
        let quality = AdaptiveQualityController::new(config.quality, viewport.device().tier);
        let notifier = match config.notification_ms {
            Some(ms) => Notifier::new(ms),
            None => Notifier::default(),
        };
        Self {
            bus: EventRegistry::new(),
            gestures: GestureRecognizer::new(config.gestures),
            viewport,
            sampler: PerformanceSampler::new(config.sampler),
            quality,
            embed: EmbedChannel::new(config.embed),
            notifier,
            save_config: config.save,
            input: InputQueue::new(),
            changes: Vec::new(),
            revision: 0,
            visible: true,
            focused: true,
            now: 0.0,
        }
    }

    /// Timestamp of the most recent frame, in milliseconds.
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Queue a raw touch event. It is classified on the next `frame`.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one frame of framework work: gestures, viewport, sampling, quality.
    pub fn frame(&mut self, now: f64, memory: &dyn MemoryProbe) {
        self.now = now;

        for event in self.input.drain() {
            self.gestures.handle(event, &mut self.bus);
        }
        self.gestures.tick(now, &mut self.bus);
        self.viewport.tick(now, &mut self.bus);
        self.embed.tick(now);

        if let Some(sample) = self.sampler.frame(now, memory, &mut self.bus) {
            if let Some(change) = self.quality.on_sample(&sample, &mut self.bus) {
                self.record(change);
            }
        }
    }

    /// Page visibility changed.
    pub fn set_visible(&mut self, visible: bool) {
        if self.visible == visible {
            return;
        }
        self.visible = visible;
        self.bus.emit(names::VISIBILITY, Event::Visibility { visible });
        if visible {
            // Frames stalled while hidden; do not let that window count.
            self.sampler.reset_window();
        } else {
            let now = self.now;
            self.gestures.flush_held_tap(now, &mut self.bus);
            self.gestures.reset();
        }
        if let Some(change) = self.quality.set_visible(visible, &mut self.bus) {
            self.record(change);
        }
    }

    /// Window focus changed.
    pub fn set_focused(&mut self, focused: bool) {
        if self.focused == focused {
            return;
        }
        self.focused = focused;
        self.bus.emit(names::FOCUS, Event::Focus { focused });
        if let Some(change) = self.quality.set_focused(focused, &mut self.bus) {
            self.record(change);
        }
    }

    /// The host reported a resize, orientation or fullscreen change.
    pub fn notify_viewport(&mut self, trigger: ViewportTrigger, probe: DeviceProbe, now: f64) {
        self.viewport.notify(trigger, probe, now);
    }

    /// Handle a message posted by the parent page.
    pub fn receive_embed(&mut self, origin: &str, raw: &str, now: f64) -> Option<HostMessage> {
        let msg = self.embed.receive(origin, raw, now, &mut self.bus)?;
        match &msg {
            HostMessage::Visibility { visible } => self.set_visible(*visible),
            HostMessage::Focus => self.set_focused(true),
            HostMessage::Blur => self.set_focused(false),
            _ => {}
        }
        Some(msg)
    }

    /// Announce readiness to the parent page.
    pub fn announce_ready(&mut self) {
        self.embed.send(&EmbedMessage::Ready {
            version: env!("CARGO_PKG_VERSION").to_string(),
        });
    }

    /// Ask the parent page to resize the embed frame.
    pub fn request_resize(&mut self, size: Vec2) {
        self.embed.send(&EmbedMessage::Resize {
            width: size.x,
            height: size.y,
        });
    }

    pub fn request_fullscreen(&mut self) {
        self.embed.send(&EmbedMessage::FullscreenRequest);
    }

    /// Current settings in their flat wire form.
    pub fn settings(&self) -> SettingsWire {
        SettingsWire::encode(self.quality.current(), self.quality.device_tier(), self.revision)
    }

    /// Number of settings changes applied so far.
    pub fn revision(&self) -> u32 {
        self.revision
    }

    /// Quality changes since the last call, oldest first.
    pub fn take_quality_changes(&mut self) -> Vec<QualityChange> {
        std::mem::take(&mut self.changes)
    }

    /// Close every stream and drop pending gesture state.
    pub fn teardown(&mut self) {
        log::info!("framework: teardown at {:.0}ms", self.now);
        self.gestures.reset();
        self.bus.teardown();
    }

    fn record(&mut self, change: QualityChange) {
        self.revision += 1;
        self.changes.push(change);
    }
}
