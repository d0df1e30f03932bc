use js_sys::Reflect;
use pulse_engine::DeviceProbe;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlCanvasElement, WebGlRenderingContext, Window};

/// `UNMASKED_RENDERER_WEBGL` from the `WEBGL_debug_renderer_info` extension.
const UNMASKED_RENDERER: u32 = 0x9246;

/// Read everything the classifier needs from the browser.
/// Missing APIs leave the corresponding field at its default.
pub fn probe_device() -> DeviceProbe {
    let Some(window) = web_sys::window() else {
        log::warn!("probe: no window, using defaults");
        return DeviceProbe::default();
    };
    let navigator = window.navigator();

    let (screen_width, screen_height) = window
        .screen()
        .ok()
        .map(|s| {
            (
                s.width().unwrap_or(0) as f32,
                s.height().unwrap_or(0) as f32,
            )
        })
        .unwrap_or_default();

    DeviceProbe {
        user_agent: navigator.user_agent().unwrap_or_default(),
        max_touch_points: navigator.max_touch_points().max(0) as u32,
        screen_width,
        screen_height,
        viewport_width: js_number(window.inner_width()).unwrap_or(screen_width),
        viewport_height: js_number(window.inner_height()).unwrap_or(screen_height),
        pixel_ratio: window.device_pixel_ratio() as f32,
        embedded: is_embedded(&window),
        gpu_renderer: gpu_renderer(&window),
        device_memory_gb: Reflect::get(&navigator, &JsValue::from_str("deviceMemory"))
            .ok()
            .and_then(|v| v.as_f64())
            .map(|gb| gb as f32),
        ..Default::default()
    }
}

fn js_number(value: Result<JsValue, JsValue>) -> Option<f32> {
    value.ok().and_then(|v| v.as_f64()).map(|n| n as f32)
}

fn is_embedded(window: &Window) -> bool {
    match window.top() {
        Ok(Some(top)) => !js_sys::Object::is(window, &top),
        // Blocked access to `top` only happens inside a frame.
        _ => true,
    }
}

fn gpu_renderer(window: &Window) -> Option<String> {
    let document = window.document()?;
    let canvas: HtmlCanvasElement = document.create_element("canvas").ok()?.dyn_into().ok()?;
    let gl: WebGlRenderingContext = canvas.get_context("webgl").ok()??.dyn_into().ok()?;

    let param = match gl.get_extension("WEBGL_debug_renderer_info") {
        Ok(Some(_)) => UNMASKED_RENDERER,
        _ => WebGlRenderingContext::RENDERER,
    };
    let renderer = gl.get_parameter(param).ok()?.as_string();
    log::debug!("probe: GPU renderer {renderer:?}");
    renderer
}
