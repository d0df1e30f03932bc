use serde::{Deserialize, Serialize};

use crate::device::DeviceTier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityTier {
    Low,
    Medium,
    High,
    Ultra,
}

impl QualityTier {
    /// Preferred tier for a device before any performance feedback.
    pub fn for_device(tier: DeviceTier) -> Self {
        match tier {
            DeviceTier::Low => QualityTier::Low,
            DeviceTier::Mid => QualityTier::Medium,
            DeviceTier::High => QualityTier::High,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShadowTier {
    Off,
    Low,
    High,
}

/// What the renderer integration should apply. Replaced as a whole, never patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSettings {
    pub quality: QualityTier,
    pub target_fps: u32,
    pub resolution_scale: f32,
    pub antialias: bool,
    pub particle_budget: u32,
    pub shadows: ShadowTier,
    pub post_processing: bool,
}

impl RenderSettings {
    /// The quality ladder.
    pub fn preset(quality: QualityTier) -> Self {
        match quality {
            QualityTier::Low => Self {
                quality,
                target_fps: 30,
                resolution_scale: 0.75,
                antialias: false,
                particle_budget: 100,
                shadows: ShadowTier::Off,
                post_processing: false,
            },
            QualityTier::Medium => Self {
                quality,
                target_fps: 60,
                resolution_scale: 0.9,
                antialias: false,
                particle_budget: 300,
                shadows: ShadowTier::Low,
                post_processing: false,
            },
            QualityTier::High => Self {
                quality,
                target_fps: 60,
                resolution_scale: 1.0,
                antialias: true,
                particle_budget: 800,
                shadows: ShadowTier::High,
                post_processing: true,
            },
            QualityTier::Ultra => Self {
                quality,
                target_fps: 60,
                resolution_scale: 1.0,
                antialias: true,
                particle_budget: 2_000,
                shadows: ShadowTier::High,
                post_processing: true,
            },
        }
    }

    /// Floor used by the emergency override: below the bottom rung of the ladder.
    pub fn emergency() -> Self {
        Self {
            resolution_scale: 0.5,
            particle_budget: 25,
            ..Self::preset(QualityTier::Low)
        }
    }

    pub fn for_device(tier: DeviceTier) -> Self {
        Self::preset(QualityTier::for_device(tier))
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self::preset(QualityTier::Medium)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ladder_is_monotonic() {
        let tiers = [QualityTier::Low, QualityTier::Medium, QualityTier::High, QualityTier::Ultra];
        for pair in tiers.windows(2) {
            let lo = RenderSettings::preset(pair[0]);
            let hi = RenderSettings::preset(pair[1]);
            assert!(lo.particle_budget < hi.particle_budget);
            assert!(lo.resolution_scale <= hi.resolution_scale);
            assert!(lo.shadows <= hi.shadows);
        }
    }

    #[test]
    fn emergency_is_below_low() {
        let low = RenderSettings::preset(QualityTier::Low);
        let e = RenderSettings::emergency();
        assert_eq!(e.quality, QualityTier::Low);
        assert!(e.resolution_scale < low.resolution_scale);
        assert!(e.particle_budget < low.particle_budget);
        assert_ne!(e, low);
    }

    #[test]
    fn device_defaults() {
        assert_eq!(RenderSettings::for_device(DeviceTier::High).quality, QualityTier::High);
        assert_eq!(RenderSettings::for_device(DeviceTier::Mid).quality, QualityTier::Medium);
        assert_eq!(RenderSettings::for_device(DeviceTier::Low).quality, QualityTier::Low);
    }
}
