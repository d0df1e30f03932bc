use serde::{Deserialize, Serialize};

use crate::core::time::Throttle;
use crate::events::{names, Channel, Event, EventRegistry, Receiver};

/// Heap introspection seam. Browsers without `performance.memory` return `None`.
pub trait MemoryProbe {
    /// Used JS heap in megabytes.
    fn used_heap_mb(&self) -> Option<f32>;
}

/// For runtimes with no heap introspection at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMemoryProbe;

impl MemoryProbe for NoMemoryProbe {
    fn used_heap_mb(&self) -> Option<f32> {
        None
    }
}

/// Fixed reading, handy for hosts that measure memory elsewhere.
#[derive(Debug, Clone, Copy)]
pub struct FixedMemory(pub f32);

impl MemoryProbe for FixedMemory {
    fn used_heap_mb(&self) -> Option<f32> {
        Some(self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Length of the FPS averaging window.
    pub window_ms: f64,
    /// How often memory is polled.
    pub memory_interval_ms: f64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            window_ms: 1_000.0,
            memory_interval_ms: 2_000.0,
        }
    }
}

/// One published measurement. Never mutated after it leaves the sampler.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceSample {
    pub fps: f32,
    /// Mean frame duration over the window.
    pub frame_time_ms: f32,
    /// `None` where the runtime cannot report it.
    pub memory_mb: Option<f32>,
    pub timestamp: f64,
}

impl PerformanceSample {
    pub fn new(fps: f32, memory_mb: Option<f32>, timestamp: f64) -> Self {
        Self {
            fps,
            frame_time_ms: if fps > 0.0 { 1_000.0 / fps } else { 0.0 },
            memory_mb,
            timestamp,
        }
    }
}

/// Counts animation frames and publishes a sample every window.
pub struct PerformanceSampler {
    config: SamplerConfig,
    window_start: Option<f64>,
    frames: u32,
    memory_mb: Option<f32>,
    memory_poll: Throttle,
    latest: Option<PerformanceSample>,
    channel: Channel<PerformanceSample>,
}

impl PerformanceSampler {
    pub fn new(config: SamplerConfig) -> Self {
        let memory_poll = Throttle::new(config.memory_interval_ms);
        Self {
            config,
            window_start: None,
            frames: 0,
            memory_mb: None,
            memory_poll,
            latest: None,
            channel: Channel::new(),
        }
    }

    pub fn subscribe(&mut self) -> Receiver<PerformanceSample> {
        self.channel.subscribe()
    }

    pub fn latest(&self) -> Option<&PerformanceSample> {
        self.latest.as_ref()
    }

    /// Call once per animation frame. Returns the sample when a window closes.
    pub fn frame(
        &mut self,
        now: f64,
        memory: &dyn MemoryProbe,
        bus: &mut EventRegistry,
    ) -> Option<PerformanceSample> {
        if self.memory_poll.try_fire(now) {
            self.memory_mb = memory.used_heap_mb();
        }

        let Some(start) = self.window_start else {
            self.window_start = Some(now);
            self.frames = 0;
            return None;
        };

        self.frames += 1;
        let elapsed = now - start;
        if elapsed < self.config.window_ms {
            return None;
        }

        let fps = (self.frames as f64 * 1_000.0 / elapsed) as f32;
        let sample = PerformanceSample {
            fps,
            frame_time_ms: (elapsed / self.frames as f64) as f32,
            memory_mb: self.memory_mb,
            timestamp: now,
        };
        self.window_start = Some(now);
        self.frames = 0;

        log::trace!("perf: {:.1} fps, memory {:?} MB", sample.fps, sample.memory_mb);
        self.latest = Some(sample.clone());
        self.channel.send(sample.clone());
        bus.emit(names::PERFORMANCE, Event::Performance(sample.clone()));
        Some(sample)
    }

    /// Restart the window, e.g. after the page was hidden and frames stalled.
    pub fn reset_window(&mut self) {
        self.window_start = None;
        self.frames = 0;
    }
}

impl Default for PerformanceSampler {
    fn default() -> Self {
        Self::new(SamplerConfig::default())
    }
}
