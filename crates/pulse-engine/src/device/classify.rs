//! Pure device and viewport classification.
//! Same probe in, same answer out; nothing here touches the browser.

use serde::{Deserialize, Serialize};

use super::info::{
    DeviceInfo, DeviceProbe, DeviceSubtype, DeviceTier, DeviceType, Orientation, ViewportState,
};

/// A named viewport-width bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub name: String,
    pub min_width: f32,
}

impl Breakpoint {
    pub fn new(name: &str, min_width: f32) -> Self {
        Self {
            name: name.to_string(),
            min_width,
        }
    }
}

/// Breakpoints kept sorted narrowest to widest, whatever order they came in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Breakpoint>", into = "Vec<Breakpoint>")]
pub struct BreakpointTable {
    entries: Vec<Breakpoint>,
}

impl BreakpointTable {
    pub fn new(mut entries: Vec<Breakpoint>) -> Self {
        entries.sort_by(|a, b| a.min_width.total_cmp(&b.min_width));
        Self { entries }
    }

    /// Widest breakpoint whose minimum the width meets. Widths below every
    /// minimum fall into the narrowest bucket.
    pub fn lookup(&self, width: f32) -> &str {
        self.entries
            .iter()
            .rev()
            .find(|bp| width >= bp.min_width)
            .or_else(|| self.entries.first())
            .map_or("", |bp| bp.name.as_str())
    }

    pub fn entries(&self) -> &[Breakpoint] {
        &self.entries
    }
}

impl Default for BreakpointTable {
    fn default() -> Self {
        Self::new(vec![
            Breakpoint::new("xs", 0.0),
            Breakpoint::new("mobile_sm", 320.0),
            Breakpoint::new("mobile", 375.0),
            Breakpoint::new("mobile_lg", 414.0),
            Breakpoint::new("tablet", 768.0),
            Breakpoint::new("tablet_lg", 834.0),
            Breakpoint::new("desktop", 1024.0),
            Breakpoint::new("desktop_lg", 1440.0),
            Breakpoint::new("desktop_xl", 1920.0),
        ])
    }
}

impl From<Vec<Breakpoint>> for BreakpointTable {
    fn from(entries: Vec<Breakpoint>) -> Self {
        Self::new(entries)
    }
}

impl From<BreakpointTable> for Vec<Breakpoint> {
    fn from(table: BreakpointTable) -> Self {
        table.entries
    }
}

/// GPU renderer substrings, checked high first, then low, then mid.
const HIGH_GPUS: &[&str] = &[
    "rtx", "geforce gtx", "radeon rx", "radeon pro", "apple m", "apple gpu", "adreno 7",
    "mali-g7", "immortalis",
];
const LOW_GPUS: &[&str] = &[
    "intel hd", "intel(r) hd", "gma", "mali-4", "mali-t", "adreno 3", "adreno 4", "powervr sgx",
    "swiftshader", "llvmpipe", "software",
];
const MID_GPUS: &[&str] = &[
    "intel iris", "intel(r) iris", "uhd graphics", "adreno 5", "adreno 6", "mali-g5", "mali-g6", "powervr",
    "radeon", "geforce",
];

const GPU_WEIGHT: f32 = 0.7;
const MEMORY_WEIGHT: f32 = 0.3;

fn gpu_score(renderer: Option<&str>) -> f32 {
    let Some(renderer) = renderer else {
        return 2.0;
    };
    let r = renderer.to_lowercase();
    let hit = |list: &[&str]| list.iter().any(|p| r.contains(p));
    if hit(HIGH_GPUS) {
        3.0
    } else if hit(LOW_GPUS) {
        1.0
    } else {
        if !hit(MID_GPUS) {
            log::debug!("unrecognized GPU '{renderer}', assuming mid tier");
        }
        2.0
    }
}

fn memory_score(memory_gb: Option<f32>) -> f32 {
    match memory_gb {
        Some(gb) if gb >= 8.0 => 3.0,
        Some(gb) if gb >= 4.0 => 2.0,
        Some(_) => 1.0,
        None => 2.0,
    }
}

/// Weighted GPU + memory heuristic. An unrecognized GPU can never leave the
/// middle tier on memory alone.
pub fn device_tier(gpu_renderer: Option<&str>, device_memory_gb: Option<f32>) -> DeviceTier {
    let score = gpu_score(gpu_renderer) * GPU_WEIGHT + memory_score(device_memory_gb) * MEMORY_WEIGHT;
    if score >= 2.5 {
        DeviceTier::High
    } else if score <= 1.5 {
        DeviceTier::Low
    } else {
        DeviceTier::Mid
    }
}

fn classify_type(probe: &DeviceProbe) -> (DeviceType, DeviceSubtype) {
    let ua = probe.user_agent.to_lowercase();
    let touch = probe.max_touch_points > 0;

    // iPadOS reports a desktop Safari UA; touch points give it away.
    if ua.contains("ipad") || (ua.contains("macintosh") && probe.max_touch_points > 1) {
        return (DeviceType::Tablet, DeviceSubtype::Ipad);
    }
    if ua.contains("iphone") || ua.contains("ipod") {
        return (DeviceType::Mobile, DeviceSubtype::Iphone);
    }
    if ua.contains("android") {
        return if ua.contains("mobile") {
            (DeviceType::Mobile, DeviceSubtype::AndroidPhone)
        } else {
            (DeviceType::Tablet, DeviceSubtype::AndroidTablet)
        };
    }
    if ua.contains("tablet") || ua.contains("kindle") || ua.contains("silk") {
        return (DeviceType::Tablet, DeviceSubtype::OtherTablet);
    }
    if ua.contains("mobi") || ua.contains("opera mini") || ua.contains("iemobile") {
        return (DeviceType::Mobile, DeviceSubtype::OtherMobile);
    }

    let short_side = probe.screen_width.min(probe.screen_height);
    let long_side = probe.screen_width.max(probe.screen_height);
    if touch && short_side < 600.0 {
        return (DeviceType::Mobile, DeviceSubtype::OtherMobile);
    }
    if touch && short_side < 1024.0 && long_side <= 1366.0 {
        return (DeviceType::Tablet, DeviceSubtype::OtherTablet);
    }

    let subtype = if ua.contains("mac os") || ua.contains("macintosh") {
        DeviceSubtype::Mac
    } else if ua.contains("windows") {
        DeviceSubtype::Windows
    } else if ua.contains("linux") || ua.contains("x11") {
        DeviceSubtype::Linux
    } else {
        DeviceSubtype::OtherDesktop
    };
    (DeviceType::Desktop, subtype)
}

/// Classify the device from a probe.
pub fn classify_device(probe: &DeviceProbe) -> DeviceInfo {
    let (device_type, subtype) = classify_type(probe);
    let tier = device_tier(probe.gpu_renderer.as_deref(), probe.device_memory_gb);
    DeviceInfo {
        device_type,
        subtype,
        orientation: Orientation::from_size(probe.viewport_width, probe.viewport_height),
        touch: probe.max_touch_points > 0,
        pixel_ratio: if probe.pixel_ratio > 0.0 { probe.pixel_ratio } else { 1.0 },
        embedded: probe.embedded,
        tier,
    }
}

/// Derive the viewport snapshot for a design resolution of `design` (w, h).
pub fn compute_viewport(
    probe: &DeviceProbe,
    device: &DeviceInfo,
    table: &BreakpointTable,
    design: (f32, f32),
) -> ViewportState {
    let width = probe.viewport_width.max(0.0);
    let height = probe.viewport_height.max(0.0);
    let scale = if design.0 > 0.0 && design.1 > 0.0 {
        (width / design.0).min(height / design.1)
    } else {
        1.0
    };
    ViewportState {
        width,
        height,
        breakpoint: table.lookup(width).to_string(),
        scale,
        orientation: device.orientation,
        safe_area: probe.safe_area,
    }
}
