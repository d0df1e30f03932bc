pub mod controller;
pub mod settings;

pub use controller::{
    candidate_settings, AdaptiveQualityController, ChangeReason, QualityChange, QualityConfig,
    QualityState,
};
pub use settings::{QualityTier, RenderSettings, ShadowTier};
