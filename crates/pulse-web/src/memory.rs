use js_sys::Reflect;
use pulse_engine::MemoryProbe;
use wasm_bindgen::JsValue;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Reads `performance.memory.usedJSHeapSize` (Chromium only).
#[derive(Debug, Clone, Copy, Default)]
pub struct PerformanceMemory;

impl MemoryProbe for PerformanceMemory {
    fn used_heap_mb(&self) -> Option<f32> {
        let window = web_sys::window()?;
        let performance = Reflect::get(&window, &JsValue::from_str("performance")).ok()?;
        let memory = Reflect::get(&performance, &JsValue::from_str("memory")).ok()?;
        if memory.is_undefined() {
            return None;
        }
        let used = Reflect::get(&memory, &JsValue::from_str("usedJSHeapSize"))
            .ok()?
            .as_f64()?;
        Some((used / BYTES_PER_MB) as f32)
    }
}
