/// Flat render-settings record read by the TypeScript engine integration.
/// Must stay in sync with `settings.ts`.
///
/// Layout (all values f32):
/// ```text
/// [0] protocol version
/// [1] quality tier        0 low, 1 medium, 2 high, 3 ultra
/// [2] target fps
/// [3] resolution scale
/// [4] antialias           0 / 1
/// [5] particle budget
/// [6] shadow tier         0 off, 1 low, 2 high
/// [7] post-processing     0 / 1
/// [8] device tier         0 low, 1 mid, 2 high
/// [9] settings revision   bumps on every applied change
/// ```

use bytemuck::{Pod, Zeroable};

use crate::device::DeviceTier;
use crate::quality::{QualityTier, RenderSettings, ShadowTier};

/// Protocol version written into slot 0.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per settings record. The wire format only ever grows.
pub const SETTINGS_FLOATS: usize = 10;

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct SettingsWire {
    pub version: f32,
    pub quality: f32,
    pub target_fps: f32,
    pub resolution_scale: f32,
    pub antialias: f32,
    pub particle_budget: f32,
    pub shadows: f32,
    pub post_processing: f32,
    pub device_tier: f32,
    pub revision: f32,
}

fn flag(b: bool) -> f32 {
    if b {
        1.0
    } else {
        0.0
    }
}

impl SettingsWire {
    pub fn encode(settings: &RenderSettings, device: DeviceTier, revision: u32) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            quality: match settings.quality {
                QualityTier::Low => 0.0,
                QualityTier::Medium => 1.0,
                QualityTier::High => 2.0,
                QualityTier::Ultra => 3.0,
            },
            target_fps: settings.target_fps as f32,
            resolution_scale: settings.resolution_scale,
            antialias: flag(settings.antialias),
            particle_budget: settings.particle_budget as f32,
            shadows: match settings.shadows {
                ShadowTier::Off => 0.0,
                ShadowTier::Low => 1.0,
                ShadowTier::High => 2.0,
            },
            post_processing: flag(settings.post_processing),
            device_tier: match device {
                DeviceTier::Low => 0.0,
                DeviceTier::Mid => 1.0,
                DeviceTier::High => 2.0,
            },
            revision: revision as f32,
        }
    }

    pub fn as_floats(&self) -> &[f32; SETTINGS_FLOATS] {
        bytemuck::cast_ref(self)
    }
}
