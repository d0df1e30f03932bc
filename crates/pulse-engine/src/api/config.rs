use serde::{Deserialize, Serialize};

use crate::device::ViewportConfig;
use crate::embed::EmbedConfig;
use crate::input::gesture::GestureConfig;
use crate::perf::SamplerConfig;
use crate::quality::QualityConfig;
use crate::save::SaveConfig;

/// Framework configuration, provided by the game.
/// Every section is optional in JSON and falls back to its defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameworkConfig {
    pub gestures: GestureConfig,
    pub viewport: ViewportConfig,
    pub sampler: SamplerConfig,
    pub quality: QualityConfig,
    pub save: SaveConfig,
    pub embed: EmbedConfig,
    /// How long notifications stay up unless a duration is given.
    pub notification_ms: Option<f64>,
}

impl FrameworkConfig {
    /// Parse a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_all_defaults() {
        let config = FrameworkConfig::from_json("{}").unwrap();
        assert_eq!(config, FrameworkConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let json = r#"{
            "quality": { "allow_ultra": true, "memory_warning_mb": 1024 },
            "gestures": { "long_press_delay_ms": 650 },
            "embed": { "expected_origin": "https://portal.example" },
            "viewport": { "breakpoints": [
                { "name": "narrow", "min_width": 0 },
                { "name": "wide", "min_width": 900 }
            ] }
        }"#;
        let config = FrameworkConfig::from_json(json).unwrap();
        assert!(config.quality.allow_ultra);
        assert_eq!(config.quality.memory_warning_mb, 1024.0);
        assert_eq!(config.quality.low_fps, 30.0);
        assert_eq!(config.gestures.long_press_delay_ms, 650.0);
        assert_eq!(config.gestures.tap_max_duration_ms, 200.0);
        assert_eq!(config.embed.expected_origin.as_deref(), Some("https://portal.example"));
        assert_eq!(config.viewport.breakpoints.lookup(1000.0), "wide");
        assert_eq!(config.viewport.debounce_ms, 50.0);
    }

    #[test]
    fn wrong_type_is_an_error() {
        assert!(FrameworkConfig::from_json(r#"{ "quality": { "low_fps": "slow" } }"#).is_err());
    }
}
