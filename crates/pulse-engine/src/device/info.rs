use serde::{Deserialize, Serialize};

/// Raw environment snapshot gathered by the host (the web crate reads it off
/// `window`, `navigator` and `screen`). Everything the classifier looks at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceProbe {
    pub user_agent: String,
    pub max_touch_points: u32,
    pub screen_width: f32,
    pub screen_height: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub pixel_ratio: f32,
    /// Running inside an iframe.
    pub embedded: bool,
    /// Unmasked WebGL renderer string, when the browser exposes it.
    pub gpu_renderer: Option<String>,
    /// `navigator.deviceMemory` in GB, when exposed.
    pub device_memory_gb: Option<f32>,
    /// Safe-area insets supplied by the host page, in CSS pixels.
    pub safe_area: SafeArea,
}

impl Default for DeviceProbe {
    fn default() -> Self {
        Self {
            user_agent: String::new(),
            max_touch_points: 0,
            screen_width: 1920.0,
            screen_height: 1080.0,
            viewport_width: 1280.0,
            viewport_height: 720.0,
            pixel_ratio: 1.0,
            embedded: false,
            gpu_renderer: None,
            device_memory_gb: None,
            safe_area: SafeArea::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SafeArea {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    Mobile,
    Tablet,
    Desktop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceSubtype {
    Iphone,
    Ipad,
    AndroidPhone,
    AndroidTablet,
    OtherMobile,
    OtherTablet,
    Mac,
    Windows,
    Linux,
    OtherDesktop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    /// Square viewports count as landscape.
    pub fn from_size(width: f32, height: f32) -> Self {
        if height > width {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        }
    }
}

/// Coarse rendering capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceTier {
    Low,
    Mid,
    High,
}

/// Classified device. Replaced wholesale on every re-classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceInfo {
    pub device_type: DeviceType,
    pub subtype: DeviceSubtype,
    pub orientation: Orientation,
    pub touch: bool,
    pub pixel_ratio: f32,
    pub embedded: bool,
    pub tier: DeviceTier,
}

impl DeviceInfo {
    pub fn is_mobile(&self) -> bool {
        self.device_type == DeviceType::Mobile
    }

    pub fn is_tablet(&self) -> bool {
        self.device_type == DeviceType::Tablet
    }
}

/// Layout snapshot derived from the device and the container size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewportState {
    pub width: f32,
    pub height: f32,
    pub breakpoint: String,
    /// Uniform scale that fits the design resolution into the viewport.
    pub scale: f32,
    pub orientation: Orientation,
    pub safe_area: SafeArea,
}
